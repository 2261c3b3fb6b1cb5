use std::ptr;

use tracing::debug;

use super::contract::Bridge;
use crate::ffi::{MessageCallback, RawMessage};

/// A service without a message store, e.g. a command sink exposing its own
/// extra exports. Retrieval always yields null and release/registration do
/// nothing; start and stop optionally call hooks.
#[derive(Debug, Clone, Copy, Default)]
pub struct Standalone {
    on_start: Option<fn()>,
    on_stop: Option<fn()>,
}

impl Standalone {
    pub const fn noop() -> Self {
        Self {
            on_start: None,
            on_stop: None,
        }
    }

    pub const fn with_hooks(on_start: fn(), on_stop: fn()) -> Self {
        Self {
            on_start: Some(on_start),
            on_stop: Some(on_stop),
        }
    }
}

impl Bridge for Standalone {
    fn start_service(&self) {
        debug!(hooked = self.on_start.is_some(), "standalone start");
        if let Some(f) = self.on_start {
            f();
        }
    }

    fn stop_service(&self) {
        debug!(hooked = self.on_stop.is_some(), "standalone stop");
        if let Some(f) = self.on_stop {
            f();
        }
    }

    fn next_message(&self) -> RawMessage {
        ptr::null_mut()
    }

    fn free_message(&self, _msg: RawMessage) {}

    fn set_message_callback(&self, _callback: MessageCallback) {}
}
