//! Consumer-side helpers: load a service library and drive it from the
//! consumer's own thread.

mod dispatcher;
#[cfg(unix)]
mod library;

pub use dispatcher::{Dispatcher, Turn};
#[cfg(unix)]
pub use library::ServiceLibrary;
