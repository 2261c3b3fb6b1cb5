mod builder;
mod contract;
mod debug;
mod service;
mod standalone;

pub use builder::ServiceBuilder;
pub use contract::Bridge;
pub use service::{Producer, Service, Worker};
pub use standalone::Standalone;

#[allow(non_snake_case)]
pub mod Store;
