use std::io;

use crate::protocol::Command;

pub type Result<T> = std::result::Result<T, FloodError>;

#[derive(thiserror::Error, Debug)]
pub enum FloodError {
    #[error("expected {expected:?} on control connection, received tag {found:#04x}")]
    UnexpectedCommand { expected: Command, found: u8 },

    #[error("short read on control connection: expected {expected} bytes, received {received}")]
    ShortRead { expected: usize, received: usize },

    #[error("INIT announced {0} streams, at least one is required")]
    InvalidStreamCount(i16),

    #[error("data worker panicked")]
    WorkerPanicked,

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl FloodError {
    /// Protocol violations are the peer's fault; everything else is transport.
    pub fn is_protocol_violation(&self) -> bool {
        matches!(
            self,
            FloodError::UnexpectedCommand { .. }
                | FloodError::ShortRead { .. }
                | FloodError::InvalidStreamCount(_)
        )
    }
}
