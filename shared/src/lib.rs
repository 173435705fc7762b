//! Parallel TCP throughput benchmark: a three-message control protocol
//! (INIT, START, END) coordinating N data streams that are flooded by the
//! client and drained by the server for a fixed wall-clock interval.

pub mod atomic_extension;
pub mod barrier;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod protocol;
pub mod worker;

pub use barrier::{RunState, SessionBarrier};
pub use config::{Config, ConnectionType};
pub use coordinator::{Client, Role, Server, SessionReport};
pub use error::{FloodError, Result};
pub use protocol::{Command, ControlMessage};
