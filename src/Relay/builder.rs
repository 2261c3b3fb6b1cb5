use std::sync::Arc;

use super::service::{Producer, Service};
use super::Store::{CurrentValueStore, MessageStore, QueueStore};

/// Configuration for a service: its name (worker thread name and log field)
/// and the worker's stack size. The store variant is picked by the build call.
pub struct ServiceBuilder {
    name: String,
    stack_size: Option<usize>,
}

impl Default for ServiceBuilder {
    fn default() -> Self {
        Self {
            name: "service".to_string(),
            stack_size: None, // std default
        }
    }
}

impl ServiceBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_stack_size(mut self, bytes: usize) -> Self {
        self.stack_size = Some(bytes);
        self
    }

    /// FIFO service: every pushed message is delivered once, in order.
    pub fn build_queue<T, F>(self, worker: F) -> Service<QueueStore<T>>
    where
        T: Send + 'static,
        F: Fn(&Producer<QueueStore<T>>) + Send + Sync + 'static,
    {
        self.build(QueueStore::new(), worker)
    }

    /// Latest-value service: intermediate values are dropped.
    pub fn build_current_value<T, F>(self, worker: F) -> Service<CurrentValueStore<T>>
    where
        T: Send + 'static,
        F: Fn(&Producer<CurrentValueStore<T>>) + Send + Sync + 'static,
    {
        self.build(CurrentValueStore::new(), worker)
    }

    pub fn build<S, F>(self, store: S, worker: F) -> Service<S>
    where
        S: MessageStore,
        F: Fn(&Producer<S>) + Send + Sync + 'static,
    {
        Service::new(self.name, self.stack_size, store, Arc::new(worker))
    }
}
