//! Notification row change events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::types::id::{NotificationId, UserId};
use crate::types::notification::Notification;

/// Row operation reported by the change feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RowEventType {
    /// A row was inserted.
    Insert,
    /// A row was updated.
    Update,
    /// A row was deleted.
    Delete,
}

/// Raw change payload as emitted by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RowChangePayload {
    /// Operation.
    #[serde(rename = "eventType")]
    pub event_type: RowEventType,
    /// Schema name.
    #[serde(default)]
    pub schema: String,
    /// Table name.
    #[serde(default)]
    pub table: String,
    /// Commit time, when the backend reports it.
    #[serde(default)]
    pub commit_timestamp: Option<DateTime<Utc>>,
    /// Row after the change (insert/update).
    #[serde(default)]
    pub new: Option<serde_json::Value>,
    /// Row before the change (update/delete).
    #[serde(default)]
    pub old: Option<serde_json::Value>,
}

/// What is known about a row before an update.
///
/// Backends that only replicate the primary key leave `is_read` unset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviousRow {
    /// Row key.
    pub id: NotificationId,
    /// Read flag before the update, if replicated.
    #[serde(default)]
    pub is_read: Option<bool>,
}

/// A typed notification change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NotificationChange {
    /// A notification was created.
    Insert {
        /// The new row.
        record: Notification,
    },
    /// A notification changed (in practice: its read flag).
    Update {
        /// State before the change.
        old: PreviousRow,
        /// State after the change.
        new: Notification,
    },
}

impl NotificationChange {
    /// Identifier of the affected notification.
    pub fn notification_id(&self) -> NotificationId {
        match self {
            Self::Insert { record } => record.id,
            Self::Update { new, .. } => new.id,
        }
    }

    /// Recipient of the affected notification.
    pub fn user_id(&self) -> UserId {
        match self {
            Self::Insert { record } => record.user_id,
            Self::Update { new, .. } => new.user_id,
        }
    }
}

impl RowChangePayload {
    /// Decodes the raw payload into a typed change.
    ///
    /// Deletes are not tracked by the client store and decode to `None`.
    pub fn into_change(self) -> Result<Option<NotificationChange>, AppError> {
        match self.event_type {
            RowEventType::Delete => Ok(None),
            RowEventType::Insert => {
                let row = self
                    .new
                    .ok_or_else(|| AppError::validation("INSERT payload is missing `new`"))?;
                let record: Notification = serde_json::from_value(row)?;
                Ok(Some(NotificationChange::Insert { record }))
            }
            RowEventType::Update => {
                let row = self
                    .new
                    .ok_or_else(|| AppError::validation("UPDATE payload is missing `new`"))?;
                let new: Notification = serde_json::from_value(row)?;
                let old = match self.old {
                    Some(value) if value.get("id").is_some() => {
                        serde_json::from_value::<PreviousRow>(value)?
                    }
                    _ => PreviousRow {
                        id: new.id,
                        is_read: None,
                    },
                };
                if old.id != new.id {
                    return Err(AppError::validation(format!(
                        "UPDATE payload ids disagree: old={} new={}",
                        old.id, new.id
                    )));
                }
                Ok(Some(NotificationChange::Update { old, new }))
            }
        }
    }
}
