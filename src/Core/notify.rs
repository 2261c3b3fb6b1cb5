// Single-slot notification channel shared by every store variant.

use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;

use crate::ffi::MessageCallback;

/// What a consumer can register to be told "a message is ready".
#[derive(Clone)]
pub enum Callback {
    /// A bare C function pointer handed in through `set_message_callback`.
    Extern(unsafe extern "C" fn()),
    /// An in-process closure, used by Rust consumers and tests.
    Closure(Arc<dyn Fn() + Send + Sync>),
}

impl Callback {
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Callback::Closure(Arc::new(f))
    }

    fn invoke(&self) {
        match self {
            Callback::Extern(f) => unsafe { f() },
            Callback::Closure(f) => f(),
        }
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Callback::Extern(p) => write!(f, "Extern({:p})", *p as *const ()),
            Callback::Closure(_) => f.write_str("Closure(..)"),
        }
    }
}

/// Holds at most one registered callback. Registration replaces the previous
/// one; `notify` with nothing registered does nothing.
#[derive(Default)]
pub struct Notifier {
    slot: Mutex<Option<Callback>>,
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, callback: Option<Callback>) {
        *self.slot.lock() = callback;
    }

    /// Register straight from the C ABI; a null pointer clears the slot.
    pub fn register_extern(&self, callback: MessageCallback) {
        self.register(callback.map(Callback::Extern));
    }

    pub fn is_registered(&self) -> bool {
        self.slot.lock().is_some()
    }

    /// Invoke the registered callback once. The slot lock is released before
    /// the call so a slow consumer never holds up registration or producers.
    pub fn notify(&self) {
        let callback = self.slot.lock().clone();
        if let Some(cb) = callback {
            cb.invoke();
        }
    }
}

impl fmt::Debug for Notifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Notifier")
            .field("callback", &*self.slot.lock())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    static EXTERN_HITS: AtomicUsize = AtomicUsize::new(0);

    unsafe extern "C" fn bump() {
        EXTERN_HITS.fetch_add(1, Ordering::SeqCst);
    }

    #[test]
    fn notify_without_registration_is_noop() {
        let n = Notifier::new();
        assert!(!n.is_registered());
        n.notify();
    }

    #[test]
    fn latest_registration_wins() {
        let n = Notifier::new();
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));

        let f = first.clone();
        n.register(Some(Callback::from_fn(move || {
            f.fetch_add(1, Ordering::SeqCst);
        })));
        n.notify();

        let s = second.clone();
        n.register(Some(Callback::from_fn(move || {
            s.fetch_add(1, Ordering::SeqCst);
        })));
        n.notify();
        n.notify();

        assert_eq!(first.load(Ordering::SeqCst), 1);
        assert_eq!(second.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn extern_callback_and_clear() {
        let n = Notifier::new();
        n.register_extern(Some(bump));
        n.notify();
        assert_eq!(EXTERN_HITS.load(Ordering::SeqCst), 1);

        n.register_extern(None);
        n.notify();
        assert_eq!(EXTERN_HITS.load(Ordering::SeqCst), 1);
    }
}
