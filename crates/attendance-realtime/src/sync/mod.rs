//! Real-time synchronization of the notification store.

pub mod filter;
pub mod reducer;
pub mod subscription;

pub use filter::SubscriptionFilter;
pub use reducer::{ChangeOutcome, apply_change};
pub use subscription::{Activation, RealtimeSync};
