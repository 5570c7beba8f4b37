//! Notification queries and read-state mutations.

use async_trait::async_trait;

use crate::result::AppResult;
use crate::types::id::NotificationId;
use crate::types::notification::Notification;

/// Backend operations on the current user's notifications.
///
/// Both mark operations are idempotent on the backend.
#[async_trait]
pub trait NotificationApi: Send + Sync + std::fmt::Debug + 'static {
    /// Lists the current user's notifications, most recent first.
    async fn fetch_notifications(&self) -> AppResult<Vec<Notification>>;

    /// Marks one notification as read.
    async fn mark_read(&self, id: NotificationId) -> AppResult<()>;

    /// Marks every notification of the current user as read.
    async fn mark_all_read(&self) -> AppResult<()>;
}
