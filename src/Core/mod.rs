pub mod doorbell;
pub mod futex;
pub mod lifecycle;
pub mod notify;

pub use doorbell::{Doorbell, DoorbellSlot, DOORBELL_SLOTS};
pub use lifecycle::{Lifecycle, Retire};
pub use notify::{Callback, Notifier};
