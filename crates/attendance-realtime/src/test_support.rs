//! Builders shared by unit tests.

use attendance_core::types::id::{NotificationId, UserId};
use attendance_core::types::notification::{Notification, NotificationCategory};
use chrono::Utc;

/// A fresh announcement for a random user.
pub fn notification(is_read: bool) -> Notification {
    notification_for(UserId::new(), is_read)
}

/// A fresh announcement for `user_id`.
pub fn notification_for(user_id: UserId, is_read: bool) -> Notification {
    Notification {
        id: NotificationId::new(),
        user_id,
        title: "Office closed Friday".to_string(),
        description: "The office is closed for the public holiday".to_string(),
        category: NotificationCategory::Announcement,
        is_read,
        created_at: Utc::now(),
        related_entity_type: None,
        related_entity_id: None,
    }
}

/// A leave-approved notification pointing at a leave request.
pub fn leave_notification(user_id: UserId, is_read: bool) -> Notification {
    Notification {
        category: NotificationCategory::LeaveApproved,
        title: "Leave approved".to_string(),
        related_entity_type: Some("leave_request".to_string()),
        related_entity_id: Some(uuid::Uuid::new_v4()),
        ..notification_for(user_id, is_read)
    }
}
