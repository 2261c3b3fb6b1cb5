//! Latest-value service publishing a random word every two seconds.

use std::ffi::{c_char, c_void, CStr, CString};
use std::thread;
use std::time::Duration;

use lazy_static::lazy_static;
use service_bridge::ffi::{MessageCallback, RawMessage};
use service_bridge::{Bridge, CurrentValueStore, Producer, Service, ServiceBuilder};
use tracing::debug;

pub const PERIOD: Duration = Duration::from_secs(2);
pub const WORDS: [&str; 5] = ["hello", "world", "this", "is", "me"];

const NULL_TEXT: &CStr = c"null";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextMessage {
    pub text: CString,
}

impl TextMessage {
    pub fn new(word: &str) -> Self {
        // words never contain NUL
        let text = CString::new(word).unwrap_or_default();
        Self { text }
    }
}

fn worker(producer: &Producer<CurrentValueStore<TextMessage>>) {
    while !producer.stopped() {
        let word = WORDS[fastrand::usize(..WORDS.len())];
        debug!(word, "word published");
        producer.set(TextMessage::new(word));
        thread::sleep(PERIOD);
    }
    debug!("text worker stopping");
}

lazy_static! {
    static ref SERVICE: Service<CurrentValueStore<TextMessage>> =
        ServiceBuilder::new().with_name("text").build_current_value(worker);
}

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

/// NUL-terminated text of `msg`, valid until `free_message(msg)`.
/// A null `msg` yields `"null"`.
///
/// # Safety
/// `msg` must be null or come from `get_next_message` and not be freed yet.
#[no_mangle]
pub unsafe extern "C" fn get_text(msg: *const c_void) -> *const c_char {
    match msg.cast::<TextMessage>().as_ref() {
        Some(m) => m.text.as_ptr(),
        None => NULL_TEXT.as_ptr(),
    }
}
