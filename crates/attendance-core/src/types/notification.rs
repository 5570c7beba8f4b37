//! Notification records as stored in the `notifications` table.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::id::{NotificationId, UserId};

/// Category tag attached to every notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationCategory {
    /// A leave request was submitted.
    LeaveSent,
    /// A leave request was approved.
    LeaveApproved,
    /// A leave request was rejected.
    LeaveRejected,
    /// A payslip is available.
    PayslipReady,
    /// Company-wide announcement.
    Announcement,
    /// Reminder to check in or out.
    AttendanceReminder,
    /// Anything else, including tags this build does not know.
    #[serde(other)]
    Other,
}

impl NotificationCategory {
    /// Whether notifications of this category point at a leave request.
    pub fn is_leave_related(self) -> bool {
        matches!(
            self,
            Self::LeaveSent | Self::LeaveApproved | Self::LeaveRejected
        )
    }

    /// Wire representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::LeaveSent => "leave_sent",
            Self::LeaveApproved => "leave_approved",
            Self::LeaveRejected => "leave_rejected",
            Self::PayslipReady => "payslip_ready",
            Self::Announcement => "announcement",
            Self::AttendanceReminder => "attendance_reminder",
            Self::Other => "other",
        }
    }
}

/// Reference from a notification to the row it talks about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedEntity {
    /// Entity kind, e.g. `"leave_request"`.
    pub entity_type: String,
    /// Entity primary key.
    pub entity_id: Uuid,
}

/// A single notification row.
///
/// Only `is_read` changes after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    /// Primary key.
    pub id: NotificationId,
    /// Recipient.
    pub user_id: UserId,
    /// Short headline.
    pub title: String,
    /// Body text.
    #[serde(alias = "message")]
    pub description: String,
    /// Category tag.
    #[serde(rename = "type")]
    pub category: NotificationCategory,
    /// Read flag.
    #[serde(default)]
    pub is_read: bool,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Related entity kind.
    #[serde(default)]
    pub related_entity_type: Option<String>,
    /// Related entity key.
    #[serde(default)]
    pub related_entity_id: Option<Uuid>,
}

impl Notification {
    /// Returns the related entity when both halves of the reference are set.
    pub fn related_entity(&self) -> Option<RelatedEntity> {
        match (&self.related_entity_type, self.related_entity_id) {
            (Some(entity_type), Some(entity_id)) => Some(RelatedEntity {
                entity_type: entity_type.clone(),
                entity_id,
            }),
            _ => None,
        }
    }

    /// Whether a leave request detail can be fetched for this notification.
    pub fn has_leave_detail(&self) -> bool {
        self.category.is_leave_related() && self.related_entity_id.is_some()
    }
}
