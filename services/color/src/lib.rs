//! Queue service emitting a random opaque colour every two seconds.

use std::ffi::c_void;
use std::thread;
use std::time::Duration;

use lazy_static::lazy_static;
use service_bridge::ffi::{MessageCallback, RawMessage};
use service_bridge::{Bridge, Producer, QueueStore, Service, ServiceBuilder};
use tracing::debug;

pub const PERIOD: Duration = Duration::from_secs(2);

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorMessage {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl ColorMessage {
    /// `0xAARRGGBB` with full alpha.
    pub fn argb(&self) -> u32 {
        0xFF00_0000 | (u32::from(self.r) << 16) | (u32::from(self.g) << 8) | u32::from(self.b)
    }
}

fn worker(producer: &Producer<QueueStore<ColorMessage>>) {
    while !producer.stopped() {
        let color = ColorMessage {
            r: fastrand::u8(..),
            g: fastrand::u8(..),
            b: fastrand::u8(..),
        };
        debug!(r = color.r, g = color.g, b = color.b, "colour produced");
        producer.push(color);
        thread::sleep(PERIOD);
    }
    debug!("colour worker stopping");
}

lazy_static! {
    static ref SERVICE: Service<QueueStore<ColorMessage>> =
        ServiceBuilder::new().with_name("color").build_queue(worker);
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

/// Colour of `msg` as `0xAARRGGBB`, or 0 for null.
///
/// # Safety
/// `msg` must come from `get_next_message` and not have been freed yet.
#[no_mangle]
pub unsafe extern "C" fn get_hexa_color(msg: *const c_void) -> u32 {
    match msg.cast::<ColorMessage>().as_ref() {
        Some(color) => color.argb(),
        None => 0,
    }
}
