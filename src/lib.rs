//! Native side of a UI ↔ worker bridge.
//!
//! Background workers publish into a message store; a foreign caller pulls
//! one message at a time through five C functions and is woken by a single
//! registered callback. See [`ffi`] for the exported contract.

// Module naming follows project convention (Core = primitives, Relay = services)
#[allow(non_snake_case)]
pub mod Core;
#[allow(non_snake_case)]
pub mod Debug;
#[allow(non_snake_case)]
pub mod Host;
#[allow(non_snake_case)]
pub mod Relay;

pub mod error;
pub mod ffi;
pub mod trace;

pub use error::BridgeError;
pub use Relay::Store::{CurrentValueStore, MessageStore, QueueStore, RELEASE_HOLD};
pub use Relay::{Bridge, Producer, Service, ServiceBuilder, Standalone};
