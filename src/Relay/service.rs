// Generic adapter tying a message store, its notifier and the worker
// lifecycle into one service object.

use std::ffi::c_void;
use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::ptr::{self, NonNull};
use std::sync::Arc;
use std::thread;

use tracing::{debug, error, info, trace, warn};

use super::contract::Bridge;
use super::Store::{CurrentValueStore, MessageStore, QueueStore};
use crate::ffi::{MessageCallback, RawMessage};
use crate::Core::{Callback, Lifecycle, Notifier, Retire};

/// User logic run on the worker thread. It should loop until
/// `producer.stopped()` and then return.
pub type Worker<S> = Arc<dyn Fn(&Producer<S>) + Send + Sync>;

pub(crate) struct Shared<S> {
    pub(crate) name: String,
    pub(crate) stack_size: Option<usize>,
    pub(crate) store: S,
    pub(crate) notifier: Notifier,
    pub(crate) lifecycle: Lifecycle,
}

/// One service: a store of type `S`, a single notification slot and a
/// start/stop controlled worker thread.
pub struct Service<S: MessageStore> {
    pub(crate) shared: Arc<Shared<S>>,
    worker: Worker<S>,
}

/// Write side of a service, handed to the worker. Every write is followed
/// by exactly one notification.
pub struct Producer<S> {
    shared: Arc<Shared<S>>,
}

impl<S> Clone for Producer<S> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<S: MessageStore> Service<S> {
    pub(crate) fn new(name: String, stack_size: Option<usize>, store: S, worker: Worker<S>) -> Self {
        Self {
            shared: Arc::new(Shared {
                name,
                stack_size,
                store,
                notifier: Notifier::new(),
                lifecycle: Lifecycle::new(),
            }),
            worker,
        }
    }

    /// Clear the stop flag and make sure exactly one worker is running.
    ///
    /// A start while a worker is alive only re-arms it. Spawn failures are
    /// logged and leave the service stopped.
    pub fn start(&self) {
        let name = &self.shared.name;
        let Some(epoch) = self.shared.lifecycle.arm() else {
            debug!(service = %name, "start while running; worker re-armed");
            return;
        };

        if let Err(e) = self.spawn_worker(epoch) {
            self.shared.lifecycle.abandon();
            error!(service = %name, error = %e, "failed to spawn worker");
            return;
        }
        info!(service = %name, epoch, "service started");
    }

    pub fn stop(&self) {
        self.shared.lifecycle.stop();
        info!(service = %self.shared.name, "stop requested");
    }

    pub fn next(&self) -> Option<NonNull<S::Message>> {
        self.shared.store.next()
    }

    pub fn release(&self, msg: *const S::Message) {
        self.shared.store.release(msg);
    }

    pub fn register(&self, callback: Option<Callback>) {
        self.shared.notifier.register(callback);
    }

    /// A producer outside the worker thread, e.g. for pushing from tests.
    pub fn producer(&self) -> Producer<S> {
        Producer {
            shared: Arc::clone(&self.shared),
        }
    }

    pub fn name(&self) -> &str {
        &self.shared.name
    }

    pub fn store(&self) -> &S {
        &self.shared.store
    }

    pub fn worker_active(&self) -> bool {
        self.shared.lifecycle.worker_active()
    }

    pub fn pending(&self) -> usize {
        self.shared.store.pending()
    }

    pub(crate) fn lifecycle(&self) -> &Lifecycle {
        &self.shared.lifecycle
    }

    pub(crate) fn notifier(&self) -> &Notifier {
        &self.shared.notifier
    }

    fn spawn_worker(&self, epoch: u64) -> io::Result<()> {
        let producer = self.producer();
        let worker = Arc::clone(&self.worker);

        let mut builder = thread::Builder::new().name(format!("{}-worker", self.shared.name));
        if let Some(size) = self.shared.stack_size {
            builder = builder.stack_size(size);
        }
        // detached; the lifecycle handshake replaces join
        builder.spawn(move || run_worker(producer, worker, epoch))?;
        Ok(())
    }
}

fn run_worker<S: MessageStore>(producer: Producer<S>, worker: Worker<S>, mut epoch: u64) {
    let name = producer.shared.name.clone();
    debug!(service = %name, epoch, "worker running");

    loop {
        if panic::catch_unwind(AssertUnwindSafe(|| worker(&producer))).is_err() {
            error!(service = %name, "worker panicked");
        }

        match producer.shared.lifecycle.retire(&mut epoch) {
            Retire::Resume => debug!(service = %name, epoch, "worker resumed by restart"),
            Retire::Stopped => {
                debug!(service = %name, "worker retired");
                return;
            }
            Retire::Abandoned => {
                warn!(service = %name, "worker returned without stop; service inert until restarted");
                return;
            }
        }
    }
}

impl<S> Producer<S> {
    /// True once `stop` was requested. Poll at every iteration boundary.
    pub fn stopped(&self) -> bool {
        self.shared.lifecycle.stopped()
    }

    pub fn name(&self) -> &str {
        &self.shared.name
    }
}

impl<T: Send + 'static> Producer<QueueStore<T>> {
    /// Append a message and notify once. The store lock is already released
    /// when the callback runs.
    pub fn push(&self, msg: T) {
        let depth = self.shared.store.push(msg);
        trace!(service = %self.shared.name, depth, "pushed");
        self.shared.notifier.notify();
    }
}

impl<T: Send + 'static> Producer<CurrentValueStore<T>> {
    /// Replace the current value and notify once.
    pub fn set(&self, msg: T) {
        let overwrote = self.shared.store.set(msg);
        trace!(service = %self.shared.name, overwrote, "value set");
        self.shared.notifier.notify();
    }
}

impl<S: MessageStore> Bridge for Service<S> {
    fn start_service(&self) {
        self.start();
    }

    fn stop_service(&self) {
        self.stop();
    }

    fn next_message(&self) -> RawMessage {
        self.next()
            .map_or(ptr::null_mut(), |p| p.as_ptr().cast::<c_void>())
    }

    fn free_message(&self, msg: RawMessage) {
        self.release(msg.cast::<S::Message>().cast_const());
    }

    fn set_message_callback(&self, callback: MessageCallback) {
        self.shared.notifier.register_extern(callback);
    }
}
