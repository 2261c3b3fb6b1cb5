// Ordered multi-message store.

use parking_lot::Mutex;
use std::collections::VecDeque;
use std::ptr::{self, NonNull};

use super::Released::ReleasedRing;
use super::MessageStore;

/// FIFO of boxed messages.
///
/// Each message lives in its own heap allocation, so growing or shifting the
/// deque never moves a message the consumer is currently reading. Release
/// matches by address, not position, because the head can only be removed by
/// the consumer but pushes keep arriving behind it. Released boxes go through
/// a [`ReleasedRing`] so their addresses are not reused by the next pushes.
pub struct QueueStore<T> {
    pub(crate) queue: Mutex<VecDeque<Box<T>>>,
    pub(crate) released: Mutex<ReleasedRing<T>>,
}

impl<T> Default for QueueStore<T> {
    fn default() -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            released: Mutex::new(ReleasedRing::new()),
        }
    }
}

impl<T> QueueStore<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append at the tail. Returns the depth after the push.
    pub fn push(&self, msg: T) -> usize {
        let boxed = Box::new(msg);
        let mut queue = self.queue.lock();
        queue.push_back(boxed);
        queue.len()
    }

    /// Borrow the head without removing it.
    pub fn peek_head(&self) -> Option<NonNull<T>> {
        self.queue.lock().front().map(|b| NonNull::from(&**b))
    }

    /// Remove the element living at `msg`. Returns whether one was found.
    pub fn release_by_identity(&self, msg: *const T) -> bool {
        if msg.is_null() {
            return false;
        }
        let removed = {
            let mut queue = self.queue.lock();
            let idx = queue.iter().position(|b| ptr::eq(&**b, msg));
            idx.and_then(|idx| queue.remove(idx))
        };
        let Some(removed) = removed else {
            return false;
        };
        let evicted = self.released.lock().park(removed);
        // payload drops outside the lock
        drop(evicted);
        true
    }

    pub fn len(&self) -> usize {
        self.queue.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.lock().is_empty()
    }
}

impl<T: Send + 'static> MessageStore for QueueStore<T> {
    type Message = T;

    fn next(&self) -> Option<NonNull<T>> {
        self.peek_head()
    }

    fn release(&self, msg: *const T) {
        self.release_by_identity(msg);
    }

    fn pending(&self) -> usize {
        self.len()
    }
}
