use std::sync::{
    atomic::{AtomicU64, AtomicU8},
    Condvar, Mutex, PoisonError,
};

use crossbeam::utils::CachePadded;
use tracing::trace;

use crate::atomic_extension::AtomicExtension;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum RunState {
    Pending = 0,
    Running = 1,
    Stopped = 2,
}

impl From<u8> for RunState {
    fn from(raw: u8) -> Self {
        match raw {
            0 => RunState::Pending,
            1 => RunState::Running,
            _ => RunState::Stopped,
        }
    }
}

/// Run flag plus byte total shared by every data worker of one session.
///
/// The flag only moves forward: `Pending -> Running -> Stopped`, or straight
/// from `Pending` to `Stopped` when a session is torn down before START.
/// Receivers drain until `Stopped`; senders wait out `Pending` on a condition
/// variable and transmit only while `Running`.
pub struct SessionBarrier {
    state: CachePadded<AtomicU8>,
    total: CachePadded<AtomicU64>,
    gate: Mutex<()>,
    released: Condvar,
}

impl Default for SessionBarrier {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionBarrier {
    pub fn new() -> Self {
        Self {
            state: AtomicU8::new(RunState::Pending as u8).into(),
            total: AtomicU64::new(0).into(),
            gate: Mutex::new(()),
            released: Condvar::new(),
        }
    }

    pub fn state(&self) -> RunState {
        self.state.load_acquire().into()
    }

    pub fn is_running(&self) -> bool {
        self.state() == RunState::Running
    }

    pub fn is_stopped(&self) -> bool {
        self.state() == RunState::Stopped
    }

    /// Opens the barrier. Has no effect once the barrier has been stopped.
    pub fn start(&self) {
        let _gate = self.gate.lock().unwrap_or_else(PoisonError::into_inner);

        if self.state() == RunState::Pending {
            self.state.store_release(RunState::Running as u8);
            trace!("barrier started");
        }

        self.released.notify_all();
    }

    pub fn stop(&self) {
        let _gate = self.gate.lock().unwrap_or_else(PoisonError::into_inner);

        let previous = RunState::from(self.state.swap_acq_rel(RunState::Stopped as u8));
        if previous != RunState::Stopped {
            trace!(?previous, "barrier stopped");
        }

        self.released.notify_all();
    }

    /// Blocks while the barrier is pending. Returns `true` if it was released
    /// by `start`, `false` if the session was stopped first.
    pub fn wait_for_start(&self) -> bool {
        let mut gate = self.gate.lock().unwrap_or_else(PoisonError::into_inner);

        while self.state() == RunState::Pending {
            gate = self
                .released
                .wait(gate)
                .unwrap_or_else(PoisonError::into_inner);
        }

        self.is_running()
    }

    /// Merges one worker's tally. Workers call this once, at exit.
    pub fn add_bytes(&self, n: u64) {
        self.total.fetch_add_acq_rel(n);
    }

    /// Only meaningful after every worker has been joined.
    pub fn total(&self) -> u64 {
        self.total.load_acquire()
    }
}
