//! Real-time change subscription.

use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::events::NotificationChange;
use crate::result::AppResult;
use crate::types::id::UserId;

/// Receiving half of a change subscription.
///
/// Dropping the receiver ends the subscription.
pub type ChangeStream = broadcast::Receiver<NotificationChange>;

/// Source of notification row changes, filtered per user.
#[async_trait]
pub trait ChangeFeed: Send + Sync + std::fmt::Debug + 'static {
    /// Opens a subscription to insert/update events whose `user_id` matches.
    ///
    /// Returns once the subscription is established.
    async fn subscribe(&self, user_id: UserId) -> AppResult<ChangeStream>;
}
