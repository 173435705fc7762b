use std::{
    io,
    thread::{Scope, ScopedJoinHandle},
};

use tracing::warn;

use crate::{
    barrier::SessionBarrier,
    error::{FloodError, Result},
};

pub mod payload;
pub mod receiver;
pub mod sender;

pub use receiver::Receiver;
pub use sender::Sender;

/// One data connection driven under control of a [`SessionBarrier`].
pub trait DataWorker: Send {
    /// Moves bytes until the barrier says otherwise and returns the local tally.
    fn transfer(&mut self, barrier: &SessionBarrier) -> io::Result<u64>;
}

/// Runs `worker` to completion and merges its tally into the barrier exactly once.
pub fn run_worker<W: DataWorker>(mut worker: W, barrier: &SessionBarrier) -> io::Result<u64> {
    let tally = worker.transfer(barrier)?;
    barrier.add_bytes(tally);
    Ok(tally)
}

pub type WorkerHandle<'scope> = ScopedJoinHandle<'scope, io::Result<u64>>;

pub fn spawn_worker<'scope, 'env, W>(
    scope: &'scope Scope<'scope, 'env>,
    worker: W,
    barrier: &'scope SessionBarrier,
) -> WorkerHandle<'scope>
where
    W: DataWorker + 'scope,
{
    scope.spawn(move || run_worker(worker, barrier))
}

/// Joins every handle, then reports the first failure. Nothing is left running
/// even when an early worker failed.
pub fn join_workers(handles: Vec<WorkerHandle<'_>>) -> Result<()> {
    let mut first_error = None;

    for handle in handles {
        let outcome = match handle.join() {
            Ok(Ok(_)) => continue,
            Ok(Err(err)) => FloodError::Io(err),
            Err(_) => FloodError::WorkerPanicked,
        };

        warn!(error = %outcome, "data worker failed");
        if first_error.is_none() {
            first_error = Some(outcome);
        }
    }

    match first_error {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
