//! Standalone service: a counter reset on start and stop, bumped through
//! its own `increment` export.

use std::sync::atomic::{AtomicI32, Ordering};

use service_bridge::ffi::{MessageCallback, RawMessage};
use service_bridge::{Bridge, Standalone};
use tracing::debug;

static COUNTER: AtomicI32 = AtomicI32::new(0);

fn reset() {
    COUNTER.store(0, Ordering::Relaxed);
    debug!("counter reset");
}

static SERVICE: Standalone = Standalone::with_hooks(reset, reset);

#[no_mangle]
pub extern "C" fn start_service() {
    SERVICE.start_service();
}

#[no_mangle]
pub extern "C" fn stop_service() {
    SERVICE.stop_service();
}

#[no_mangle]
pub extern "C" fn get_next_message() -> RawMessage {
    SERVICE.next_message()
}

#[no_mangle]
pub extern "C" fn free_message(msg: RawMessage) {
    SERVICE.free_message(msg);
}

#[no_mangle]
pub extern "C" fn set_message_callback(callback: MessageCallback) {
    SERVICE.set_message_callback(callback);
}

/// Bump the counter and return the new value.
#[no_mangle]
pub extern "C" fn increment() -> i32 {
    COUNTER.fetch_add(1, Ordering::Relaxed) + 1
}
