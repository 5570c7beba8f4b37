//! In-memory change feed for single-process use, replays, and tests.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tokio::sync::broadcast;
use tracing::debug;

use attendance_core::config::realtime::RealtimeConfig;
use attendance_core::events::{NotificationChange, RowChangePayload};
use attendance_core::result::AppResult;
use attendance_core::traits::realtime::{ChangeFeed, ChangeStream};
use attendance_core::types::id::UserId;

use crate::sync::filter::SubscriptionFilter;

/// Routes changes to per-user broadcast channels.
///
/// Channels whose receivers are all gone are dropped on the next subscribe.
#[derive(Debug)]
pub struct MemoryChangeFeed {
    /// Channel name → broadcast sender
    channels: RwLock<HashMap<String, broadcast::Sender<NotificationChange>>>,
    config: RealtimeConfig,
}

impl MemoryChangeFeed {
    /// Create a feed for the configured table.
    pub fn new(config: &RealtimeConfig) -> Self {
        Self {
            channels: RwLock::new(HashMap::new()),
            config: config.clone(),
        }
    }

    /// Publish a change to its recipient's channel.
    ///
    /// Returns the number of subscribers that received it.
    pub async fn publish(&self, change: NotificationChange) -> usize {
        let channel = self.channel_for(change.user_id());
        let channels = self.channels.read().await;
        match channels.get(&channel) {
            Some(tx) => tx.send(change).unwrap_or(0),
            None => {
                debug!(%channel, "No subscribers for change");
                0
            }
        }
    }

    /// Decode a raw row payload and publish it.
    ///
    /// Deletes and rows from other tables are skipped.
    pub async fn publish_payload(&self, payload: RowChangePayload) -> AppResult<usize> {
        if !self.matches_table(&payload) {
            debug!(schema = %payload.schema, table = %payload.table, "Ignoring change for other table");
            return Ok(0);
        }
        match payload.into_change()? {
            Some(change) => Ok(self.publish(change).await),
            None => Ok(0),
        }
    }

    /// Number of live receivers for `user_id`.
    pub async fn subscriber_count(&self, user_id: UserId) -> usize {
        let channels = self.channels.read().await;
        channels
            .get(&self.channel_for(user_id))
            .map(|tx| tx.receiver_count())
            .unwrap_or(0)
    }

    fn channel_for(&self, user_id: UserId) -> String {
        SubscriptionFilter::for_user(&self.config, user_id).channel_name()
    }

    fn matches_table(&self, payload: &RowChangePayload) -> bool {
        (payload.schema.is_empty() || payload.schema == self.config.schema)
            && (payload.table.is_empty() || payload.table == self.config.table)
    }
}

#[async_trait]
impl ChangeFeed for MemoryChangeFeed {
    async fn subscribe(&self, user_id: UserId) -> AppResult<ChangeStream> {
        let channel = self.channel_for(user_id);
        let mut channels = self.channels.write().await;
        let before = channels.len();
        channels.retain(|_, tx| tx.receiver_count() > 0);
        let pruned = before - channels.len();
        if pruned > 0 {
            debug!(pruned, "Dropped channels without receivers");
        }
        let tx = channels
            .entry(channel)
            .or_insert_with(|| broadcast::channel(self.config.channel_buffer_size).0);
        Ok(tx.subscribe())
    }
}
