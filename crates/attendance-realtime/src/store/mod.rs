//! Client-side notification state.

pub mod notifications;
pub mod shared;

pub use notifications::{NotificationStore, ReadTransition, StoreSnapshot, UpdateOutcome};
pub use shared::SharedStore;
