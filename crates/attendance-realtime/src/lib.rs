//! # attendance-realtime
//!
//! Client-side notification state for Attendance Hub. Provides:
//!
//! - An ordered notification store with an incrementally maintained unread count
//! - Real-time sync applying per-user row changes to the store
//! - Deferred read tracking for the notifications list
//! - An in-memory change feed for single-process use and replays

pub mod bridge;
pub mod store;
pub mod sync;
pub mod tracking;
pub mod view;

#[cfg(test)]
mod test_support;

pub use bridge::MemoryChangeFeed;
pub use store::{NotificationStore, SharedStore, StoreSnapshot};
pub use sync::{Activation, RealtimeSync, SubscriptionFilter};
pub use tracking::{ReadTrackingSession, TrackingState};
pub use view::{NotificationListView, NotificationsHandle, OpenOutcome};
