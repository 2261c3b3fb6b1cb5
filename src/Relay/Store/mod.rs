#[allow(non_snake_case)]
pub mod CurrentValue;
#[allow(non_snake_case)]
pub mod Queue;
#[allow(non_snake_case)]
pub mod Released;

pub use CurrentValue::CurrentValueStore;
pub use Queue::QueueStore;
pub use Released::RELEASE_HOLD;

use std::ptr::NonNull;

/// Storage behind a service: holds messages until the consumer releases them.
///
/// Writing is variant-specific (`QueueStore::push`, `CurrentValueStore::set`);
/// reading and releasing are uniform so one adapter can serve every variant.
pub trait MessageStore: Send + Sync + 'static {
    type Message: Send + 'static;

    /// Pointer to the next message, or `None` when nothing is ready. The
    /// pointee stays put until it is handed back to `release`.
    fn next(&self) -> Option<NonNull<Self::Message>>;

    /// Give a message back. Unknown or already released pointers are ignored.
    fn release(&self, msg: *const Self::Message);

    /// Messages currently observable through `next`.
    fn pending(&self) -> usize;
}
