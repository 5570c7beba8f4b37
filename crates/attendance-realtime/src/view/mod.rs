//! View-level controllers wiring the store, sync, and read tracking together.

pub mod list;
pub mod notifications;

pub use list::{FlushReport, NotificationListView, OpenOutcome, OpenedNotification};
pub use notifications::{LoadState, NotificationsHandle};
