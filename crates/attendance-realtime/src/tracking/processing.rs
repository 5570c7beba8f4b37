//! Per-notification in-flight guard.

use std::sync::Arc;

use dashmap::DashSet;

use attendance_core::types::id::NotificationId;

/// Tracks notifications whose click is being handled.
///
/// A second click on the same notification while the first is in flight is
/// a no-op rather than a second mark-read or detail fetch.
#[derive(Debug, Clone, Default)]
pub struct ProcessingGuard {
    in_flight: Arc<DashSet<NotificationId>>,
}

/// Held while a notification is being processed; releases on drop.
#[derive(Debug)]
pub struct ProcessingTicket {
    id: NotificationId,
    in_flight: Arc<DashSet<NotificationId>>,
}

impl ProcessingGuard {
    /// Creates an empty guard.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts processing `id`, or returns `None` if it is already in flight.
    pub fn try_begin(&self, id: NotificationId) -> Option<ProcessingTicket> {
        if self.in_flight.insert(id) {
            Some(ProcessingTicket {
                id,
                in_flight: self.in_flight.clone(),
            })
        } else {
            None
        }
    }

    /// Whether `id` is in flight.
    pub fn is_processing(&self, id: NotificationId) -> bool {
        self.in_flight.contains(&id)
    }
}

impl ProcessingTicket {
    /// The notification being processed.
    pub fn id(&self) -> NotificationId {
        self.id
    }
}

impl Drop for ProcessingTicket {
    fn drop(&mut self) {
        self.in_flight.remove(&self.id);
    }
}
