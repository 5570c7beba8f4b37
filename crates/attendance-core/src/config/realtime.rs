//! Real-time change feed configuration.

use serde::{Deserialize, Serialize};

/// Settings for the notification change subscription.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealtimeConfig {
    /// Buffer size for in-memory broadcast channels.
    #[serde(default = "default_channel_buffer")]
    pub channel_buffer_size: usize,
    /// How long to wait for a subscription to become established.
    #[serde(default = "default_subscribe_timeout")]
    pub subscribe_timeout_seconds: u64,
    /// Database schema the notification rows live in.
    #[serde(default = "default_schema")]
    pub schema: String,
    /// Table whose row changes are streamed.
    #[serde(default = "default_table")]
    pub table: String,
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            channel_buffer_size: default_channel_buffer(),
            subscribe_timeout_seconds: default_subscribe_timeout(),
            schema: default_schema(),
            table: default_table(),
        }
    }
}

fn default_channel_buffer() -> usize {
    256
}

fn default_subscribe_timeout() -> u64 {
    10
}

fn default_schema() -> String {
    "public".to_string()
}

fn default_table() -> String {
    "notifications".to_string()
}
