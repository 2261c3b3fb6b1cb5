// Start/stop control for a service's worker thread.

use crossbeam_utils::CachePadded;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

/// What a worker should do after its body has returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Retire {
    /// A `start` arrived while the body was winding down; run it again.
    Resume,
    /// The stop flag is set; the worker thread exits.
    Stopped,
    /// The body returned on its own with no stop requested. The thread exits
    /// and the service stays inert until the next `start`.
    Abandoned,
}

#[derive(Debug, Default)]
struct WorkerState {
    /// A worker thread exists and has not retired.
    active: bool,
    /// Bumped by every `start`; a worker compares it against the value it
    /// was launched (or last resumed) with.
    epoch: u64,
}

/// Stopped → Running → Stopped, with the worker handshake that keeps one
/// worker thread per service.
///
/// The stop flag is the only thing a running worker polls. `state` is taken
/// on `start` and when a worker body returns, never while producing.
#[derive(Debug)]
pub struct Lifecycle {
    stop: CachePadded<AtomicBool>,
    state: Mutex<WorkerState>,
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self {
            stop: CachePadded::new(AtomicBool::new(true)),
            state: Mutex::new(WorkerState::default()),
        }
    }
}

impl Lifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear the stop flag. Returns the epoch the caller must launch a new
    /// worker with, or `None` when a live worker already picked up the
    /// re-armed flag.
    pub fn arm(&self) -> Option<u64> {
        let mut state = self.state.lock();
        self.stop.store(false, Ordering::Release);
        state.epoch = state.epoch.wrapping_add(1);
        if state.active {
            return None;
        }
        state.active = true;
        Some(state.epoch)
    }

    /// Undo an `arm` whose worker could not be launched.
    pub fn abandon(&self) {
        let mut state = self.state.lock();
        state.active = false;
        self.stop.store(true, Ordering::Release);
    }

    /// Request a cooperative stop. Idempotent, never waits.
    pub fn stop(&self) {
        self.stop.store(true, Ordering::Release);
    }

    #[inline]
    pub fn stopped(&self) -> bool {
        self.stop.load(Ordering::Acquire)
    }

    /// Called by the worker thread each time its body returns. `epoch` is
    /// updated in place on `Retire::Resume`.
    pub fn retire(&self, epoch: &mut u64) -> Retire {
        let mut state = self.state.lock();
        if self.stopped() {
            state.active = false;
            return Retire::Stopped;
        }
        if state.epoch != *epoch {
            *epoch = state.epoch;
            return Retire::Resume;
        }
        state.active = false;
        Retire::Abandoned
    }

    /// A worker thread is alive. Not part of the C contract.
    pub fn worker_active(&self) -> bool {
        self.state.lock().active
    }

    pub fn epoch(&self) -> u64 {
        self.state.lock().epoch
    }
}
