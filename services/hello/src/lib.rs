//! Standalone service with no store and no hooks; its only job is `hello`.

use std::io::Write;

use service_bridge::ffi::{MessageCallback, RawMessage};
use service_bridge::{Bridge, Standalone};
use tracing::warn;

static SERVICE: Standalone = Standalone::noop();

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

#[no_mangle]
pub extern "C" fn hello() {
    let mut out = std::io::stdout().lock();
    if let Err(e) = writeln!(out, "Hello from the hello service!").and_then(|()| out.flush()) {
        warn!(error = %e, "hello could not write to stdout");
    }
}
