// Single-slot latest-value store.

use parking_lot::Mutex;
use std::ptr::{self, NonNull};

use super::Released::ReleasedRing;
use super::MessageStore;

pub(crate) struct Slot<T> {
    /// Latest value. Kept after release; only `ready` decides visibility.
    pub(crate) value: Option<Box<T>>,
    pub(crate) ready: bool,
    /// `value` has been handed to the consumer and not released yet.
    pub(crate) lent: bool,
    /// `value` has been handed to the consumer at least once.
    pub(crate) handed: bool,
    /// Overwritten values the consumer may still be reading.
    pub(crate) retired: Vec<Box<T>>,
    /// Values the consumer is done with, kept allocated for a while.
    pub(crate) released: ReleasedRing<T>,
}

/// Holds only the most recent message.
///
/// A slow consumer sees the latest value and nothing older. Overwriting a
/// value the consumer is still reading parks the old box until the consumer
/// releases it, so the pointer it holds never dangles.
///
/// At most one reference is expected in flight: lending a new value moves
/// every still-retired value into the released ring, so `retired` never
/// outgrows the values overwritten since the last retrieval.
pub struct CurrentValueStore<T> {
    pub(crate) slot: Mutex<Slot<T>>,
}

impl<T> Default for CurrentValueStore<T> {
    fn default() -> Self {
        Self {
            slot: Mutex::new(Slot {
                value: None,
                ready: false,
                lent: false,
                handed: false,
                retired: Vec::new(),
                released: ReleasedRing::new(),
            }),
        }
    }
}

impl<T> CurrentValueStore<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the slot and mark it ready. Returns true when a value that
    /// was never released got replaced.
    pub fn set(&self, msg: T) -> bool {
        let boxed = Box::new(msg);
        let mut slot = self.slot.lock();
        let unread = slot.ready;
        let old = slot.value.replace(boxed);
        let lent = std::mem::replace(&mut slot.lent, false);
        let handed = std::mem::replace(&mut slot.handed, false);
        slot.ready = true;

        // a value never handed out has no outstanding pointers
        let dropped = match old {
            Some(old) if lent => {
                slot.retired.push(old);
                None
            }
            Some(old) if handed => slot.released.park(old),
            old => old,
        };
        drop(slot);
        drop(dropped);
        unread
    }

    pub fn peek(&self) -> Option<NonNull<T>> {
        let mut slot = self.slot.lock();
        if !slot.ready {
            return None;
        }
        let ptr = slot.value.as_deref().map(NonNull::from)?;
        slot.lent = true;
        slot.handed = true;

        let mut dropped = Vec::new();
        if !slot.retired.is_empty() {
            let retired = std::mem::take(&mut slot.retired);
            for old in retired {
                dropped.extend(slot.released.park(old));
            }
        }
        drop(slot);
        drop(dropped);
        Some(ptr)
    }

    /// Release `msg`. Releasing the current value clears the ready flag;
    /// releasing an overwritten value retires it for good and leaves the
    /// newer one ready.
    pub fn release_ptr(&self, msg: *const T) -> bool {
        if msg.is_null() {
            return false;
        }
        let mut slot = self.slot.lock();
        if slot.value.as_deref().is_some_and(|v| ptr::eq(v, msg)) {
            slot.ready = false;
            slot.lent = false;
            return true;
        }
        let Some(idx) = slot.retired.iter().position(|b| ptr::eq(&**b, msg)) else {
            return false;
        };
        let old = slot.retired.swap_remove(idx);
        let dropped = slot.released.park(old);
        drop(slot);
        drop(dropped);
        true
    }

    pub fn is_ready(&self) -> bool {
        self.slot.lock().ready
    }
}

impl<T: Send + 'static> MessageStore for CurrentValueStore<T> {
    type Message = T;

    fn next(&self) -> Option<NonNull<T>> {
        self.peek()
    }

    fn release(&self, msg: *const T) {
        self.release_ptr(msg);
    }

    fn pending(&self) -> usize {
        usize::from(self.is_ready())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_until_set() {
        let s: CurrentValueStore<u8> = CurrentValueStore::new();
        assert!(s.peek().is_none());
        assert!(!s.set(1));
        assert!(s.set(2));
        assert_eq!(unsafe { *s.peek().unwrap().as_ref() }, 2);
    }

    #[test]
    fn overwrite_while_lent_keeps_old_alive() {
        let s = CurrentValueStore::new();
        s.set(String::from("first"));
        let first = s.peek().unwrap();

        s.set(String::from("second"));
        // the consumer can still read what it was given
        assert_eq!(unsafe { first.as_ref() }, "first");
        assert_eq!(s.slot.lock().retired.len(), 1);

        // releasing the stale pointer leaves the new value ready
        assert!(s.release_ptr(first.as_ptr()));
        assert!(s.is_ready());
        assert!(s.slot.lock().retired.is_empty());

        let second = s.peek().unwrap();
        assert_eq!(unsafe { second.as_ref() }, "second");
        assert!(s.release_ptr(second.as_ptr()));
        assert!(s.peek().is_none());
    }

    #[test]
    fn duplicate_release_after_new_sets_keeps_latest() {
        let s = CurrentValueStore::new();
        s.set(1u64);
        let first = s.peek().unwrap();
        assert!(s.release_ptr(first.as_ptr()));

        s.set(2);
        s.set(3);
        assert!(!s.release_ptr(first.as_ptr()));
        assert!(s.is_ready());
        assert_eq!(unsafe { *s.peek().unwrap().as_ref() }, 3);
    }

    #[test]
    fn retired_values_move_on_when_a_new_value_is_lent() {
        let s = CurrentValueStore::new();
        for i in 0..10u32 {
            s.set(i);
            // retrieved but never released
            s.peek().unwrap();
        }
        let slot = s.slot.lock();
        assert!(slot.retired.is_empty());
        assert_eq!(slot.released.len(), 9);
    }
}
