// Hold-back ring for released messages.

use std::collections::VecDeque;

/// Released messages kept allocated before they are dropped.
pub const RELEASE_HOLD: usize = 64;

/// FIFO of released boxes.
///
/// A message freed on release would hand its address straight back to the
/// allocator, and the next push or set often lands on it. A late duplicate
/// release would then match the new message. Parking the last
/// [`RELEASE_HOLD`] released boxes keeps their addresses out of circulation,
/// so a duplicate release within that window finds no live message.
pub(crate) struct ReleasedRing<T> {
    held: VecDeque<Box<T>>,
}

impl<T> ReleasedRing<T> {
    pub(crate) const fn new() -> Self {
        Self { held: VecDeque::new() }
    }

    /// Park `msg`. Returns the box that aged out, for the caller to drop
    /// outside its lock.
    pub(crate) fn park(&mut self, msg: Box<T>) -> Option<Box<T>> {
        let evicted = if self.held.len() >= RELEASE_HOLD {
            self.held.pop_front()
        } else {
            None
        };
        self.held.push_back(msg);
        evicted
    }

    pub(crate) fn len(&self) -> usize {
        self.held.len()
    }
}
