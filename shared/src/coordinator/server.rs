use std::{
    net::{IpAddr, SocketAddr, TcpListener, TcpStream},
    thread,
    time::Duration,
};

use quanta::Clock;
use tracing::{debug, error, info};

use crate::{
    barrier::SessionBarrier,
    config::Config,
    error::{FloodError, Result},
    protocol::{Command, ControlMessage},
    worker::{join_workers, spawn_worker, Receiver},
};

use super::{Role, SessionGuard, SessionReport};

/// Listening side. Control and data connections all arrive on one socket and
/// are told apart only by where the session is in its lifecycle.
pub struct Server {
    listener: TcpListener,
    config: Config,
}

impl Server {
    pub fn bind(config: Config, bind_addr: IpAddr) -> Result<Self> {
        let listener = TcpListener::bind(SocketAddr::new(bind_addr, config.port))?;

        Ok(Self { listener, config })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Serves sessions one after another, forever.
    ///
    /// A failed session is logged and the server goes back to waiting for the
    /// next control connection. Only a failure to accept a control
    /// connection ends the loop.
    pub fn run(&self, mut on_report: impl FnMut(&SessionReport)) -> Result<()> {
        info!("Server started listening at {}", self.local_addr()?);

        loop {
            let (control, peer) = self.listener.accept()?;
            debug!(%peer, "accepted control connection");

            match self.serve_session(control) {
                Ok(report) => on_report(&report),
                Err(err) => error!(%peer, error = %err, "session aborted"),
            }
        }
    }

    /// Accepts one control connection and runs its session to the end.
    pub fn accept_session(&self) -> Result<SessionReport> {
        let (control, peer) = self.listener.accept()?;
        debug!(%peer, "accepted control connection");

        self.serve_session(control)
    }

    pub fn serve_session(&self, control: TcpStream) -> Result<SessionReport> {
        let num_streams = ControlMessage::read_init(&control)?;

        if num_streams < 1 {
            return Err(FloodError::InvalidStreamCount(num_streams));
        }

        info!("Opening {} streams", num_streams);

        let barrier = SessionBarrier::new();
        let clock = Clock::new();

        let elapsed = thread::scope(|s| -> Result<Duration> {
            let mut guard = SessionGuard::new(&barrier);
            let mut workers = Vec::with_capacity(num_streams as usize);

            // Receivers start draining as soon as they are accepted; the
            // barrier only decides when they stop.
            for _ in 0..num_streams {
                let (stream, peer) = self.listener.accept()?;
                debug!(local = ?stream.local_addr().ok(), %peer, "connected receiver");

                guard.track(&stream)?;
                let receiver = Receiver::new(stream, self.config.recv_buffer_size);
                workers.push(spawn_worker(s, receiver, &barrier));
            }

            info!("All streams established");

            barrier.start();
            ControlMessage::Start.write_to(&control)?;
            let begin = clock.now();

            ControlMessage::read_from(&control, Command::End)?;
            let elapsed = clock.now() - begin;

            info!("Test finished, shutting down receivers");

            barrier.stop();
            join_workers(workers)?;
            guard.complete();

            Ok(elapsed)
        })?;

        let report = SessionReport {
            role: Role::Server,
            streams: num_streams,
            bytes: barrier.total(),
            elapsed,
        };

        info!("Total bytes received: {:.3} GB", report.gigabytes());

        Ok(report)
    }
}
