//! Ordered notification list with an incrementally maintained unread counter.

use std::collections::HashSet;

use serde::Serialize;
use tracing::debug;

use attendance_core::types::id::NotificationId;
use attendance_core::types::notification::Notification;

/// How an update changed a record's read flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadTransition {
    /// Read flag did not change.
    Unchanged,
    /// Unread → read.
    MarkedRead,
    /// Read → unread.
    MarkedUnread,
}

/// Result of [`NotificationStore::update_by_id`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The record was replaced in place.
    Applied(ReadTransition),
    /// No record with that identifier is held.
    Missing,
}

/// Point-in-time copy of the store for rendering.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StoreSnapshot {
    /// Records, most recent first.
    pub notifications: Vec<Notification>,
    /// Number of records with `is_read == false`.
    pub unread_count: usize,
}

/// The current user's notifications, most recent first.
///
/// Identifiers are unique and `unread_count` always equals the number of
/// unread records once a method returns. The counter is adjusted by the
/// read-flag transition of each mutation; only [`replace_all`] recounts.
///
/// [`replace_all`]: NotificationStore::replace_all
#[derive(Debug, Clone, Default)]
pub struct NotificationStore {
    items: Vec<Notification>,
    unread: usize,
}

impl NotificationStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces every record after a full refetch.
    ///
    /// Later duplicates of an identifier are dropped.
    pub fn replace_all(&mut self, records: Vec<Notification>) {
        let mut seen = HashSet::with_capacity(records.len());
        self.items = records
            .into_iter()
            .filter(|n| seen.insert(n.id))
            .collect();
        self.unread = self.items.iter().filter(|n| !n.is_read).count();
        debug!(
            total = self.items.len(),
            unread = self.unread,
            "Notification store replaced"
        );
    }

    /// Inserts `record` at the front unless its identifier is already held.
    ///
    /// Returns `true` if the record was inserted.
    pub fn insert_if_absent(&mut self, record: Notification) -> bool {
        if self.position(record.id).is_some() {
            return false;
        }
        if !record.is_read {
            self.unread += 1;
        }
        self.items.insert(0, record);
        true
    }

    /// Replaces the record with the same identifier, keeping its position.
    ///
    /// The counter moves by the transition between the held record and
    /// `record`. `reported_was_read` is the before-state claimed by the
    /// event source; when it disagrees with the held record (for example
    /// after an optimistic local mark-read) the held record wins.
    pub fn update_by_id(
        &mut self,
        record: Notification,
        reported_was_read: Option<bool>,
    ) -> UpdateOutcome {
        let Some(index) = self.position(record.id) else {
            return UpdateOutcome::Missing;
        };

        let was_read = self.items[index].is_read;
        if let Some(reported) = reported_was_read {
            if reported != was_read {
                debug!(
                    id = %record.id,
                    reported,
                    held = was_read,
                    "Stale before-state in update, using held record"
                );
            }
        }

        let transition = match (was_read, record.is_read) {
            (false, true) => {
                self.unread = self.unread.saturating_sub(1);
                ReadTransition::MarkedRead
            }
            (true, false) => {
                self.unread += 1;
                ReadTransition::MarkedUnread
            }
            _ => ReadTransition::Unchanged,
        };
        self.items[index] = record;
        UpdateOutcome::Applied(transition)
    }

    /// Marks the given records read. Returns how many were unread.
    pub fn mark_read(&mut self, ids: &[NotificationId]) -> usize {
        let wanted: HashSet<NotificationId> = ids.iter().copied().collect();
        let mut changed = 0;
        for item in self.items.iter_mut() {
            if !item.is_read && wanted.contains(&item.id) {
                item.is_read = true;
                changed += 1;
            }
        }
        self.unread = self.unread.saturating_sub(changed);
        changed
    }

    /// Marks every record read. Returns how many were unread.
    pub fn mark_all_read(&mut self) -> usize {
        let changed = self.unread;
        for item in self.items.iter_mut() {
            item.is_read = true;
        }
        self.unread = 0;
        changed
    }

    /// Looks up a record.
    pub fn get(&self, id: NotificationId) -> Option<&Notification> {
        self.items.iter().find(|n| n.id == id)
    }

    /// Identifiers of unread records, in list order.
    pub fn unread_ids(&self) -> Vec<NotificationId> {
        self.items
            .iter()
            .filter(|n| !n.is_read)
            .map(|n| n.id)
            .collect()
    }

    /// Records, most recent first.
    pub fn notifications(&self) -> &[Notification] {
        &self.items
    }

    /// Unread count.
    pub fn unread_count(&self) -> usize {
        self.unread
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Copies the current state.
    pub fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            notifications: self.items.clone(),
            unread_count: self.unread,
        }
    }

    fn position(&self, id: NotificationId) -> Option<usize> {
        self.items.iter().position(|n| n.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::notification;

    fn assert_counter_consistent(store: &NotificationStore) {
        let actual = store.notifications().iter().filter(|n| !n.is_read).count();
        assert_eq!(store.unread_count(), actual);
    }

    #[test]
    fn test_insert_puts_newest_first_and_dedupes() {
        let mut store = NotificationStore::new();
        let a = notification(false);
        let b = notification(true);

        assert!(store.insert_if_absent(a.clone()));
        assert!(store.insert_if_absent(b.clone()));
        assert!(!store.insert_if_absent(a.clone()));

        let ids: Vec<_> = store.notifications().iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![b.id, a.id]);
        assert_eq!(store.unread_count(), 1);
        assert_counter_consistent(&store);
    }

    #[test]
    fn test_update_keeps_position() {
        let mut store = NotificationStore::new();
        let a = notification(false);
        let b = notification(false);
        store.replace_all(vec![a.clone(), b.clone()]);

        let mut read_b = b.clone();
        read_b.is_read = true;
        assert_eq!(
            store.update_by_id(read_b, Some(false)),
            UpdateOutcome::Applied(ReadTransition::MarkedRead)
        );
        assert_eq!(store.notifications()[1].id, b.id);
        assert!(store.notifications()[1].is_read);
        assert_eq!(store.unread_count(), 1);
    }

    #[test]
    fn test_update_unread_again_increments() {
        let mut store = NotificationStore::new();
        let a = notification(true);
        store.replace_all(vec![a.clone()]);

        let mut unread = a.clone();
        unread.is_read = false;
        assert_eq!(
            store.update_by_id(unread, Some(true)),
            UpdateOutcome::Applied(ReadTransition::MarkedUnread)
        );
        assert_eq!(store.unread_count(), 1);
    }

    #[test]
    fn test_update_missing_is_reported() {
        let mut store = NotificationStore::new();
        assert_eq!(
            store.update_by_id(notification(true), Some(false)),
            UpdateOutcome::Missing
        );
        assert!(store.is_empty());
    }

    #[test]
    fn test_stale_before_state_does_not_double_decrement() {
        let mut store = NotificationStore::new();
        let a = notification(false);
        store.replace_all(vec![a.clone()]);

        // Optimistic local mark, then the backend echo arrives claiming false → true.
        store.mark_read(&[a.id]);
        let mut echoed = a.clone();
        echoed.is_read = true;
        assert_eq!(
            store.update_by_id(echoed, Some(false)),
            UpdateOutcome::Applied(ReadTransition::Unchanged)
        );
        assert_eq!(store.unread_count(), 0);
        assert_counter_consistent(&store);
    }

    #[test]
    fn test_mark_read_is_idempotent() {
        let mut store = NotificationStore::new();
        let a = notification(false);
        let b = notification(false);
        store.replace_all(vec![a.clone(), b.clone()]);

        assert_eq!(store.mark_read(&[a.id]), 1);
        assert_eq!(store.mark_read(&[a.id]), 0);
        assert!(store.get(a.id).unwrap().is_read);
        assert_eq!(store.unread_count(), 1);
        assert_counter_consistent(&store);
    }

    #[test]
    fn test_mark_all_read() {
        let mut store = NotificationStore::new();
        store.replace_all(vec![notification(false), notification(false), notification(true)]);
        assert_eq!(store.mark_all_read(), 2);
        assert_eq!(store.unread_count(), 0);
        assert!(store.unread_ids().is_empty());
    }

    #[test]
    fn test_replace_all_drops_duplicate_ids() {
        let mut store = NotificationStore::new();
        let a = notification(false);
        store.replace_all(vec![a.clone(), a.clone(), notification(true)]);
        assert_eq!(store.len(), 2);
        assert_eq!(store.unread_count(), 1);
    }
}
