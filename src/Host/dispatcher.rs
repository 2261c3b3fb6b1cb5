// Consumer loop: one notification, at most one retrieve/release cycle.

use std::ffi::c_void;
use std::ptr::NonNull;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tracing::{debug, trace};

use crate::error::BridgeError;
use crate::Core::DoorbellSlot;
use crate::Relay::Bridge;

/// Outcome of one `Dispatcher::turn`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Turn {
    /// No notification arrived before the timeout.
    Idle,
    /// Notified, but the store had nothing ready (a latest-value store folds
    /// several notifications into one message).
    Empty,
    /// One message was retrieved, handed to the handler and released.
    Handled,
}

/// Drives a service from the consumer's own thread.
///
/// The service's callback is pointed at a claimed doorbell, so the worker
/// thread only rings; retrieval, handling and release all happen here. Each
/// notification is answered by at most one cycle and the store is never
/// drained in a loop.
pub struct Dispatcher<'a, B: Bridge + ?Sized> {
    bridge: &'a B,
    slot: DoorbellSlot,
    seen: u32,
    handled: u64,
}

impl<'a, B: Bridge + ?Sized> Dispatcher<'a, B> {
    pub fn new(bridge: &'a B) -> Result<Self, BridgeError> {
        let slot = DoorbellSlot::claim()?;
        let seen = slot.bell().count();
        bridge.set_message_callback(Some(slot.callback()));
        debug!(slot = slot.index(), "dispatcher attached");
        Ok(Self {
            bridge,
            slot,
            seen,
            handled: 0,
        })
    }

    /// Notifications received but not yet answered.
    pub fn backlog(&self) -> u32 {
        self.slot.bell().count().wrapping_sub(self.seen)
    }

    pub fn handled(&self) -> u64 {
        self.handled
    }

    /// Wait up to `timeout` for a notification and answer it with one cycle.
    /// The message pointer is valid only inside `handler`.
    pub fn turn<F>(&mut self, timeout: Duration, handler: F) -> Turn
    where
        F: FnOnce(NonNull<c_void>),
    {
        if self.backlog() == 0 {
            self.slot.bell().wait_timeout(self.seen, timeout);
            if self.backlog() == 0 {
                return Turn::Idle;
            }
        }
        self.seen = self.seen.wrapping_add(1);

        let Some(msg) = NonNull::new(self.bridge.next_message()) else {
            trace!("notified but nothing ready");
            return Turn::Empty;
        };
        handler(msg);
        self.bridge.free_message(msg.as_ptr());
        self.handled += 1;
        Turn::Handled
    }

    /// Keep taking turns until `stop` is set. Returns the number of messages
    /// handled during this call.
    pub fn run<F>(&mut self, stop: &AtomicBool, poll: Duration, mut handler: F) -> u64
    where
        F: FnMut(NonNull<c_void>),
    {
        let before = self.handled;
        while !stop.load(Ordering::Acquire) {
            self.turn(poll, &mut handler);
        }
        self.handled - before
    }
}

impl<B: Bridge + ?Sized> Drop for Dispatcher<'_, B> {
    fn drop(&mut self) {
        // detach before the doorbell slot can be reused
        self.bridge.set_message_callback(None);
        debug!(slot = self.slot.index(), handled = self.handled, "dispatcher detached");
    }
}
