use crate::ffi::{MessageCallback, RawMessage};

/// The five operations every service offers its consumer.
///
/// None of them fail: an empty store yields a null message, and releasing
/// something that is not outstanding is ignored. Implemented by the in-process
/// adapters (`Service`, `Standalone`) and by a dynamically loaded
/// `ServiceLibrary`, so a consumer can treat all of them alike.
pub trait Bridge: Send + Sync {
    fn start_service(&self);

    /// Cooperative; returns before the worker has necessarily finished.
    fn stop_service(&self);

    fn next_message(&self) -> RawMessage;

    fn free_message(&self, msg: RawMessage);

    fn set_message_callback(&self, callback: MessageCallback);
}
