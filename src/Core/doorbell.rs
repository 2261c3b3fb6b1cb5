// Consumer-side landing spot for notifications.
//
// A C callback carries no context pointer, so each claimable doorbell gets its
// own `extern "C"` trampoline. The trampoline only bumps a counter and wakes
// the consumer thread; everything else happens on the consumer's side.

use crossbeam_utils::CachePadded;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{Duration, Instant};

use super::futex::{futex_wait, futex_wake_all};
use crate::error::BridgeError;

/// Number of doorbells that can be claimed at once in a process.
pub const DOORBELL_SLOTS: usize = 8;

/// Counting, edge-triggered wakeup. Rings are never lost: a consumer compares
/// the current count with the last count it handled.
pub struct Doorbell {
    rung: CachePadded<AtomicU32>,
}

impl Doorbell {
    pub const fn new() -> Self {
        Self {
            rung: CachePadded::new(AtomicU32::new(0)),
        }
    }

    /// Safe to call from any thread, including a service worker.
    pub fn ring(&self) {
        self.rung.fetch_add(1, Ordering::Release);
        futex_wake_all(&self.rung);
    }

    pub fn count(&self) -> u32 {
        self.rung.load(Ordering::Acquire)
    }

    /// Wait until the count moves away from `seen` or `timeout` expires.
    /// Returns the count observed last.
    pub fn wait_timeout(&self, seen: u32, timeout: Duration) -> u32 {
        let deadline = Instant::now() + timeout;
        loop {
            let now_count = self.count();
            if now_count != seen {
                return now_count;
            }
            let now = Instant::now();
            if now >= deadline {
                return now_count;
            }
            futex_wait(&self.rung, seen, Some(deadline - now));
        }
    }
}

impl Default for Doorbell {
    fn default() -> Self {
        Self::new()
    }
}

#[allow(clippy::declare_interior_mutable_const)]
const IDLE: Doorbell = Doorbell::new();
static BELLS: [Doorbell; DOORBELL_SLOTS] = [IDLE; DOORBELL_SLOTS];
static CLAIMED: Mutex<[bool; DOORBELL_SLOTS]> = parking_lot::const_mutex([false; DOORBELL_SLOTS]);

extern "C" fn ring_slot<const N: usize>() {
    BELLS[N].ring();
}

static TRAMPOLINES: [unsafe extern "C" fn(); DOORBELL_SLOTS] = [
    ring_slot::<0>,
    ring_slot::<1>,
    ring_slot::<2>,
    ring_slot::<3>,
    ring_slot::<4>,
    ring_slot::<5>,
    ring_slot::<6>,
    ring_slot::<7>,
];

/// Exclusive claim on one process-wide doorbell and its C trampoline.
/// Dropping the claim returns the slot.
#[derive(Debug)]
pub struct DoorbellSlot {
    index: usize,
}

impl DoorbellSlot {
    pub fn claim() -> Result<Self, BridgeError> {
        let mut claimed = CLAIMED.lock();
        let index = claimed
            .iter()
            .position(|taken| !taken)
            .ok_or(BridgeError::DoorbellsExhausted {
                slots: DOORBELL_SLOTS,
            })?;
        claimed[index] = true;
        Ok(Self { index })
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn bell(&self) -> &'static Doorbell {
        &BELLS[self.index]
    }

    /// Function pointer suitable for `set_message_callback`.
    pub fn callback(&self) -> unsafe extern "C" fn() {
        TRAMPOLINES[self.index]
    }
}

impl Drop for DoorbellSlot {
    fn drop(&mut self) {
        CLAIMED.lock()[self.index] = false;
    }
}
