use std::{io, net::TcpStream};

use tracing::debug;

use crate::barrier::SessionBarrier;

use super::{payload::Payload, DataWorker};

/// Floods one data connection with a fixed payload while the barrier runs.
#[derive(Debug)]
pub struct Sender {
    stream: TcpStream,
    payload: Payload,
}

impl Sender {
    pub fn new(stream: TcpStream, payload_size: usize) -> io::Result<Self> {
        Ok(Self {
            stream,
            payload: Payload::zeroed(payload_size)?,
        })
    }
}

impl DataWorker for Sender {
    fn transfer(&mut self, barrier: &SessionBarrier) -> io::Result<u64> {
        if !barrier.wait_for_start() {
            debug!("session stopped before start, sender exits idle");
            return Ok(0);
        }

        let mut sent = 0u64;

        while barrier.is_running() {
            self.payload.transmit(&self.stream)?;
            sent += self.payload.len() as u64;
        }

        Ok(sent)
    }
}
