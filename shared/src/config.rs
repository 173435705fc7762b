use std::{net::IpAddr, time::Duration};

pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_DURATION: Duration = Duration::from_secs(10);
pub const RECV_BUFFER_SIZE: usize = 4 * 1024 * 1024;
pub const PAYLOAD_SIZE: usize = 10 * 1024 * 1024;
pub const PROGRESS_INTERVAL: Duration = Duration::from_secs(1);

/// Knobs shared by both ends of a benchmark run.
#[derive(Debug, Clone, Copy)]
pub struct Config {
    pub port: u16,
    pub duration: Duration,
    pub recv_buffer_size: usize,
    pub payload_size: usize,
    pub progress_interval: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            duration: DEFAULT_DURATION,
            recv_buffer_size: RECV_BUFFER_SIZE,
            payload_size: PAYLOAD_SIZE,
            progress_interval: PROGRESS_INTERVAL,
        }
    }
}

impl Config {
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }
}

#[derive(Debug, Clone)]
pub enum ConnectionType {
    Server { bind_addr: IpAddr },
    Client { server: String, parallel: i16 },
}
