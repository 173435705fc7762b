use std::{net::TcpStream, thread, time::Duration};

use quanta::{Clock, Instant};
use tracing::{debug, info};

use crate::{
    barrier::SessionBarrier,
    config::Config,
    error::{FloodError, Result},
    protocol::{Command, ControlMessage},
    worker::{join_workers, spawn_worker, Sender},
};

use super::{Role, SessionGuard, SessionReport};

/// Sending side of one benchmark run.
pub struct Client {
    config: Config,
    server: String,
    parallel: i16,
}

impl Client {
    pub fn new(config: Config, server: impl Into<String>, parallel: i16) -> Self {
        Self {
            config,
            server: server.into(),
            parallel,
        }
    }

    pub fn run(&self) -> Result<SessionReport> {
        if self.parallel < 1 {
            return Err(FloodError::InvalidStreamCount(self.parallel));
        }

        let control = TcpStream::connect((self.server.as_str(), self.config.port))?;
        // Data connections go to the exact address the control connection reached.
        let server_addr = control.peer_addr()?;

        ControlMessage::Init {
            num_streams: self.parallel,
        }
        .write_to(&control)?;

        info!("Opening {} streams", self.parallel);

        let barrier = SessionBarrier::new();
        let clock = Clock::new();

        let elapsed = thread::scope(|s| -> Result<Duration> {
            let mut guard = SessionGuard::new(&barrier);
            let mut workers = Vec::with_capacity(self.parallel as usize);

            for _ in 0..self.parallel {
                let stream = TcpStream::connect(server_addr)?;
                debug!(
                    local = ?stream.local_addr().ok(),
                    remote = %server_addr,
                    "connected sender"
                );

                guard.track(&stream)?;
                let sender = Sender::new(stream, self.config.payload_size)?;
                workers.push(spawn_worker(s, sender, &barrier));
            }

            ControlMessage::read_from(&control, Command::Start)?;

            info!("All streams established, starting measurement");
            info!("Test will run for {:?}", self.config.duration);

            barrier.start();
            let begin = clock.now();

            self.hold(&clock, begin, |_| info!("Running..."));

            barrier.stop();
            let end = clock.now();

            info!("Shutting down all senders");

            join_workers(workers)?;
            guard.complete();

            Ok(end - begin)
        })?;

        ControlMessage::End.write_to(&control)?;

        let report = SessionReport {
            role: Role::Client,
            streams: self.parallel,
            bytes: barrier.total(),
            elapsed,
        };

        info!("Total bytes sent: {:.3} GB", report.gigabytes());

        Ok(report)
    }

    // Wall-clock hold, independent of how the senders are doing. Ticks once
    // per progress interval, before each sleep.
    fn hold(&self, clock: &Clock, begin: Instant, mut on_tick: impl FnMut(Duration)) {
        loop {
            let elapsed = clock.now() - begin;
            if elapsed >= self.config.duration {
                break;
            }

            on_tick(elapsed);
            thread::sleep((self.config.duration - elapsed).min(self.config.progress_interval));
        }
    }
}
