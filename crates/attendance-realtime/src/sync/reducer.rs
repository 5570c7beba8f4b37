//! Pure merge of change events into the store.

use tracing::{debug, warn};

use attendance_core::events::NotificationChange;

use crate::store::notifications::{NotificationStore, ReadTransition, UpdateOutcome};

/// What applying one change did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeOutcome {
    /// A new record was placed at the front.
    Inserted,
    /// An insert for an identifier already held; nothing changed.
    Duplicate,
    /// A held record was replaced in place.
    Updated(ReadTransition),
    /// An update for an identifier not held; dropped.
    UnknownRecord,
}

/// Applies `change` to `store`.
///
/// Inserts are deduplicated by identifier. Updates keep the record's
/// position and move the unread counter by the read-flag transition. An
/// update that arrives before its insert is dropped; there is no reorder
/// buffer, and a later refetch repairs the list.
pub fn apply_change(store: &mut NotificationStore, change: NotificationChange) -> ChangeOutcome {
    match change {
        NotificationChange::Insert { record } => {
            let id = record.id;
            if store.insert_if_absent(record) {
                debug!(%id, unread = store.unread_count(), "Notification inserted");
                ChangeOutcome::Inserted
            } else {
                debug!(%id, "Duplicate insert ignored");
                ChangeOutcome::Duplicate
            }
        }
        NotificationChange::Update { old, new } => {
            let id = new.id;
            match store.update_by_id(new, old.is_read) {
                UpdateOutcome::Applied(transition) => {
                    debug!(%id, ?transition, unread = store.unread_count(), "Notification updated");
                    ChangeOutcome::Updated(transition)
                }
                UpdateOutcome::Missing => {
                    warn!(%id, "Update for unknown notification dropped");
                    ChangeOutcome::UnknownRecord
                }
            }
        }
    }
}
