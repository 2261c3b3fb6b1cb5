use std::fmt;

use super::service::Service;
use super::Store::{CurrentValueStore, MessageStore, QueueStore};

// Debug proxy implementations that call the standalone debug functions
impl<S: MessageStore> fmt::Debug for Service<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        crate::Debug::StructDebug::debug_service(self, f)
    }
}

impl<T> fmt::Debug for QueueStore<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        crate::Debug::StructDebug::debug_queue_store(self, f)
    }
}

impl<T> fmt::Debug for CurrentValueStore<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        crate::Debug::StructDebug::debug_current_value_store(self, f)
    }
}
