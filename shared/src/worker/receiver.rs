use std::{
    io::{self, Read},
    net::TcpStream,
};

use derivative::Derivative;
use tracing::debug;

use crate::barrier::SessionBarrier;

use super::DataWorker;

/// Drains one accepted data connection, discarding the payload.
#[derive(Derivative)]
#[derivative(Debug)]
pub struct Receiver {
    stream: TcpStream,
    #[derivative(Debug = "ignore")]
    buffer: Vec<u8>,
}

impl Receiver {
    pub fn new(stream: TcpStream, buffer_size: usize) -> Self {
        Self {
            stream,
            buffer: vec![0; buffer_size],
        }
    }
}

impl DataWorker for Receiver {
    // The flag is checked once per completed read, so a read in flight when
    // the barrier stops still counts.
    fn transfer(&mut self, barrier: &SessionBarrier) -> io::Result<u64> {
        let mut received = 0u64;

        while !barrier.is_stopped() {
            match self.stream.read(&mut self.buffer) {
                Ok(0) => {
                    debug!(peer = ?self.stream.peer_addr().ok(), "data connection closed by peer");
                    break;
                }
                Ok(n) => received += n as u64,
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(err),
            }
        }

        Ok(received)
    }
}
