use std::{
    io,
    net::{Shutdown, TcpStream},
};

use crate::barrier::SessionBarrier;

pub mod client;
pub mod report;
pub mod server;

pub use client::Client;
pub use report::{Role, SessionReport};
pub use server::Server;

/// Stops the barrier when a session ends for any reason. If the session did
/// not complete, the data sockets are shut down as well so that workers
/// blocked in I/O return and can be joined.
struct SessionGuard<'a> {
    barrier: &'a SessionBarrier,
    streams: Vec<TcpStream>,
    completed: bool,
}

impl<'a> SessionGuard<'a> {
    fn new(barrier: &'a SessionBarrier) -> Self {
        Self {
            barrier,
            streams: Vec::new(),
            completed: false,
        }
    }

    fn track(&mut self, stream: &TcpStream) -> io::Result<()> {
        self.streams.push(stream.try_clone()?);
        Ok(())
    }

    fn complete(&mut self) {
        self.completed = true;
    }
}

impl Drop for SessionGuard<'_> {
    fn drop(&mut self) {
        self.barrier.stop();

        if !self.completed {
            for stream in &self.streams {
                let _ = stream.shutdown(Shutdown::Both);
            }
        }
    }
}
