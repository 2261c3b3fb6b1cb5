use std::fmt;

use crate::Relay::Store::{CurrentValueStore, MessageStore, QueueStore};
use crate::Relay::Service;

/// Debug function for Service
///
/// Shows:
/// - Service name
/// - Whether a worker thread is alive and the stop flag
/// - Start epoch and pending message count
/// - Notification registration
///
/// Message payloads are never printed.
pub fn debug_service<S: MessageStore>(service: &Service<S>, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let lifecycle = service.lifecycle();
    f.debug_struct("Service")
        .field("name", &service.name())
        .field("worker_active", &lifecycle.worker_active())
        .field("stopped", &lifecycle.stopped())
        .field("epoch", &lifecycle.epoch())
        .field("pending", &service.pending())
        .field("notifier", service.notifier())
        .finish()
}

/// Debug function for QueueStore
///
/// Shows the queue depth, the address of the head element and how many
/// released messages are still held back
pub fn debug_queue_store<T>(store: &QueueStore<T>, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let queue = store.queue.lock();
    let head = queue.front().map(|b| &**b as *const T);
    f.debug_struct("QueueStore")
        .field("depth", &queue.len())
        .field("head", &format_args!("{:?}", head))
        .field("released", &store.released.lock().len())
        .finish()
}

/// Debug function for CurrentValueStore
pub fn debug_current_value_store<T>(store: &CurrentValueStore<T>, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let slot = store.slot.lock();
    f.debug_struct("CurrentValueStore")
        .field("ready", &slot.ready)
        .field("lent", &slot.lent)
        .field("retired", &slot.retired.len())
        .field("released", &slot.released.len())
        .finish_non_exhaustive()
}
