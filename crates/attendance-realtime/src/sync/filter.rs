//! Row filter identifying one user's notification change channel.

use serde::{Deserialize, Serialize};

use attendance_core::config::realtime::RealtimeConfig;
use attendance_core::types::id::UserId;

/// Scope of a change subscription: one table, rows of one user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubscriptionFilter {
    /// Schema name.
    pub schema: String,
    /// Table name.
    pub table: String,
    /// Rows whose `user_id` equals this value.
    pub user_id: UserId,
}

impl SubscriptionFilter {
    /// Builds the filter for `user_id` using the configured table.
    pub fn for_user(config: &RealtimeConfig, user_id: UserId) -> Self {
        Self {
            schema: config.schema.clone(),
            table: config.table.clone(),
            user_id,
        }
    }

    /// Channel name, e.g. `public:notifications:user_id=eq.<uuid>`.
    pub fn channel_name(&self) -> String {
        format!("{}:{}:user_id=eq.{}", self.schema, self.table, self.user_id)
    }
}
