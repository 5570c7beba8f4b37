//! Shared handle to the notification store.

use std::sync::{Arc, RwLock};

use tokio::sync::watch;

use super::notifications::{NotificationStore, StoreSnapshot};

/// A cloneable handle to one [`NotificationStore`].
///
/// Every mutation runs inside a single write section, so readers never see
/// a list and a counter that disagree. Each write bumps a version that
/// renderers can wait on through [`SharedStore::changes`].
#[derive(Debug, Clone)]
pub struct SharedStore {
    inner: Arc<RwLock<NotificationStore>>,
    version: Arc<watch::Sender<u64>>,
}

impl SharedStore {
    /// Creates a handle around an empty store.
    pub fn new() -> Self {
        let (tx, _) = watch::channel(0);
        Self {
            inner: Arc::new(RwLock::new(NotificationStore::new())),
            version: Arc::new(tx),
        }
    }

    /// Runs `f` with shared access.
    pub fn read<R>(&self, f: impl FnOnce(&NotificationStore) -> R) -> R {
        let guard = self.inner.read().unwrap_or_else(|e| e.into_inner());
        f(&guard)
    }

    /// Runs `f` with exclusive access and notifies watchers.
    pub fn write<R>(&self, f: impl FnOnce(&mut NotificationStore) -> R) -> R {
        let result = {
            let mut guard = self.inner.write().unwrap_or_else(|e| e.into_inner());
            f(&mut guard)
        };
        self.version.send_modify(|v| *v = v.wrapping_add(1));
        result
    }

    /// Copies the current state.
    pub fn snapshot(&self) -> StoreSnapshot {
        self.read(NotificationStore::snapshot)
    }

    /// Current unread count.
    pub fn unread_count(&self) -> usize {
        self.read(NotificationStore::unread_count)
    }

    /// Receiver that changes whenever the store is written.
    pub fn changes(&self) -> watch::Receiver<u64> {
        self.version.subscribe()
    }
}

impl Default for SharedStore {
    fn default() -> Self {
        Self::new()
    }
}
