//! Marks notifications read when they are clicked or when the list closes.
//!
//! ```text
//! Idle ──(loaded, non-empty)──▶ Captured ──(click)──▶ Draining
//!                                  │                     │
//!                                  └──────(unmount)──────┴──▶ Flushed
//! ```

use std::collections::HashSet;

use tracing::debug;

use attendance_core::types::id::NotificationId;
use attendance_core::types::notification::Notification;

/// Lifecycle state of a [`ReadTrackingSession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackingState {
    /// The list has not finished loading with content yet.
    Idle,
    /// The initial unread set was recorded.
    Captured,
    /// At least one tracked notification was clicked.
    Draining,
    /// Remaining notifications were handed out for marking. Terminal.
    Flushed,
}

/// Per-view record of which notifications were unread when the list opened.
///
/// The unread set is captured once. Clicked notifications leave the set so
/// the exit flush never submits them a second time.
#[derive(Debug, Clone)]
pub struct ReadTrackingSession {
    state: TrackingState,
    pending: HashSet<NotificationId>,
}

impl ReadTrackingSession {
    /// Creates an idle session.
    pub fn new() -> Self {
        Self {
            state: TrackingState::Idle,
            pending: HashSet::new(),
        }
    }

    /// Current state.
    pub fn state(&self) -> TrackingState {
        self.state
    }

    /// Identifiers still waiting for the exit flush.
    pub fn pending(&self) -> &HashSet<NotificationId> {
        &self.pending
    }

    /// Feeds the list's loading flag and records.
    ///
    /// Captures the unread identifiers the first time loading is finished
    /// and the list is non-empty. Returns `true` on that transition only.
    pub fn observe(&mut self, loading: bool, records: &[Notification]) -> bool {
        if self.state != TrackingState::Idle || loading || records.is_empty() {
            return false;
        }
        self.pending = records
            .iter()
            .filter(|n| !n.is_read)
            .map(|n| n.id)
            .collect();
        self.state = TrackingState::Captured;
        debug!(unread = self.pending.len(), "Captured initial unread set");
        true
    }

    /// Records that `id` was clicked and marked read on the spot.
    ///
    /// Returns `true` if `id` was still tracked.
    pub fn on_click(&mut self, id: NotificationId) -> bool {
        match self.state {
            TrackingState::Captured | TrackingState::Draining => {
                let removed = self.pending.remove(&id);
                if removed {
                    self.state = TrackingState::Draining;
                }
                removed
            }
            TrackingState::Idle | TrackingState::Flushed => false,
        }
    }

    /// Ends the session and returns the identifiers to mark read.
    ///
    /// A session that never captured stays idle and flushes nothing; a
    /// flushed session returns nothing on later calls.
    pub fn flush(&mut self) -> Vec<NotificationId> {
        match self.state {
            TrackingState::Idle | TrackingState::Flushed => Vec::new(),
            TrackingState::Captured | TrackingState::Draining => {
                self.state = TrackingState::Flushed;
                let mut ids: Vec<NotificationId> = self.pending.drain().collect();
                ids.sort();
                debug!(count = ids.len(), "Flushing unread set");
                ids
            }
        }
    }
}

impl Default for ReadTrackingSession {
    fn default() -> Self {
        Self::new()
    }
}
