//! Notification state for one mounted view: list, unread count, loading and
//! error flags, live updates, and read mutations.

use std::sync::Arc;

use futures::future::join_all;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

use attendance_core::config::realtime::RealtimeConfig;
use attendance_core::result::AppResult;
use attendance_core::traits::auth::UserResolver;
use attendance_core::traits::notification::NotificationApi;
use attendance_core::traits::realtime::ChangeFeed;
use attendance_core::types::id::NotificationId;

use crate::store::notifications::StoreSnapshot;
use crate::store::shared::SharedStore;
use crate::sync::subscription::{Activation, RealtimeSync};

/// Loading and error flags exposed to the view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadState {
    /// A fetch is in progress (or none has completed yet).
    pub loading: bool,
    /// Message of the last fetch failure, cleared by the next successful fetch.
    pub error: Option<String>,
}

/// Owns the store and its live subscription for one view.
#[derive(Debug)]
pub struct NotificationsHandle {
    api: Arc<dyn NotificationApi>,
    store: SharedStore,
    sync: RealtimeSync,
    state: watch::Sender<LoadState>,
}

impl NotificationsHandle {
    /// Creates a handle with an empty store, in the loading state.
    pub fn new(
        api: Arc<dyn NotificationApi>,
        users: Arc<dyn UserResolver>,
        feed: Arc<dyn ChangeFeed>,
        config: &RealtimeConfig,
    ) -> Self {
        let store = SharedStore::new();
        let sync = RealtimeSync::new(users, feed, store.clone(), config.clone());
        Self {
            api,
            store,
            sync,
            state: watch::Sender::new(LoadState {
                loading: true,
                error: None,
            }),
        }
    }

    /// Starts live updates.
    pub async fn activate(&self) -> AppResult<Activation> {
        self.sync.activate().await
    }

    /// Stops live updates. Idempotent.
    pub fn deactivate(&self) -> bool {
        self.sync.deactivate()
    }

    /// Refetches the full list and replaces the store.
    ///
    /// A failure is logged, kept as the error state, and returned.
    pub async fn refresh(&self) -> AppResult<()> {
        self.set_state(true, None);
        match self.api.fetch_notifications().await {
            Ok(records) => {
                self.store.write(|s| s.replace_all(records));
                self.set_state(false, None);
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Failed to fetch notifications");
                self.set_state(false, Some(e.to_string()));
                Err(e)
            }
        }
    }

    /// Marks one notification read locally, then on the backend.
    ///
    /// Already-read notifications are left alone. A backend failure is
    /// logged and returned without rolling back; a refresh resyncs.
    pub async fn mark_as_read(&self, id: NotificationId) -> AppResult<()> {
        let changed = self.store.write(|s| s.mark_read(&[id]));
        if changed == 0 {
            debug!(%id, "Notification already read");
            return Ok(());
        }
        self.api.mark_read(id).await.inspect_err(|e| {
            warn!(%id, error = %e, "Failed to mark notification read");
        })
    }

    /// Marks every notification read locally, then on the backend.
    pub async fn mark_all_as_read(&self) -> AppResult<()> {
        let changed = self.store.write(|s| s.mark_all_read());
        debug!(changed, "Marked all notifications read locally");
        self.api.mark_all_read().await.inspect_err(|e| {
            warn!(error = %e, "Failed to mark all notifications read");
        })
    }

    /// Issues one backend mark-read per identifier, in parallel, without
    /// waiting for them. Failures are logged only.
    ///
    /// Returns the background task, or `None` when there is nothing to send
    /// or no runtime to send it on.
    pub fn spawn_mark_read(&self, ids: Vec<NotificationId>) -> Option<JoinHandle<()>> {
        if ids.is_empty() {
            return None;
        }
        let runtime = match Handle::try_current() {
            Ok(runtime) => runtime,
            Err(_) => {
                warn!(count = ids.len(), "No runtime available, mark-read not sent");
                return None;
            }
        };

        let api = self.api.clone();
        Some(runtime.spawn(async move {
            let results = join_all(ids.iter().map(|id| api.mark_read(*id))).await;
            for (id, result) in ids.iter().zip(results) {
                if let Err(e) = result {
                    warn!(%id, error = %e, "Background mark-read failed");
                }
            }
        }))
    }

    /// Current loading and error flags.
    pub fn load_state(&self) -> LoadState {
        self.state.borrow().clone()
    }

    /// Whether a fetch is in progress.
    pub fn is_loading(&self) -> bool {
        self.state.borrow().loading
    }

    /// Receiver that changes whenever the loading or error flags change.
    pub fn load_states(&self) -> watch::Receiver<LoadState> {
        self.state.subscribe()
    }

    /// Copies the current list and unread count.
    pub fn snapshot(&self) -> StoreSnapshot {
        self.store.snapshot()
    }

    /// Current unread count.
    pub fn unread_count(&self) -> usize {
        self.store.unread_count()
    }

    /// Receiver that changes whenever the list changes.
    pub fn changes(&self) -> watch::Receiver<u64> {
        self.store.changes()
    }

    /// The underlying store.
    pub fn store(&self) -> &SharedStore {
        &self.store
    }

    /// Whether live updates are running.
    pub fn is_live(&self) -> bool {
        self.sync.is_subscribed()
    }

    fn set_state(&self, loading: bool, error: Option<String>) {
        self.state.send_replace(LoadState { loading, error });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, Ordering};

    use async_trait::async_trait;
    use attendance_core::error::AppError;
    use attendance_core::traits::realtime::ChangeStream;
    use attendance_core::types::id::UserId;
    use attendance_core::types::notification::Notification;
    use tokio::sync::broadcast;

    use crate::test_support::notification;

    #[derive(Debug, Default)]
    struct FakeApi {
        records: Mutex<Vec<Notification>>,
        marked: Mutex<Vec<NotificationId>>,
        mark_all_calls: Mutex<usize>,
        fail_fetch: AtomicBool,
        fail_mark: AtomicBool,
    }

    #[async_trait]
    impl NotificationApi for FakeApi {
        async fn fetch_notifications(&self) -> AppResult<Vec<Notification>> {
            if self.fail_fetch.load(Ordering::SeqCst) {
                return Err(AppError::backend("503 from notifications"));
            }
            Ok(self.records.lock().unwrap().clone())
        }

        async fn mark_read(&self, id: NotificationId) -> AppResult<()> {
            self.marked.lock().unwrap().push(id);
            if self.fail_mark.load(Ordering::SeqCst) {
                return Err(AppError::backend("timeout"));
            }
            Ok(())
        }

        async fn mark_all_read(&self) -> AppResult<()> {
            *self.mark_all_calls.lock().unwrap() += 1;
            Ok(())
        }
    }

    #[derive(Debug)]
    struct NoUser;

    #[async_trait]
    impl UserResolver for NoUser {
        async fn current_user(&self) -> AppResult<Option<UserId>> {
            Ok(None)
        }
    }

    #[derive(Debug)]
    struct SilentFeed;

    #[async_trait]
    impl ChangeFeed for SilentFeed {
        async fn subscribe(&self, _user_id: UserId) -> AppResult<ChangeStream> {
            Ok(broadcast::channel(1).1)
        }
    }

    fn handle(api: Arc<FakeApi>) -> NotificationsHandle {
        NotificationsHandle::new(
            api,
            Arc::new(NoUser),
            Arc::new(SilentFeed),
            &RealtimeConfig::default(),
        )
    }

    #[tokio::test]
    async fn test_refresh_loads_list() {
        let api = Arc::new(FakeApi::default());
        *api.records.lock().unwrap() = vec![notification(false), notification(true)];
        let h = handle(api);

        assert!(h.is_loading());
        h.refresh().await.unwrap();
        let state = h.load_state();
        assert!(!state.loading);
        assert!(state.error.is_none());
        assert_eq!(h.snapshot().notifications.len(), 2);
        assert_eq!(h.unread_count(), 1);
    }

    #[tokio::test]
    async fn test_refresh_failure_sets_error() {
        let api = Arc::new(FakeApi::default());
        api.fail_fetch.store(true, Ordering::SeqCst);
        let h = handle(api.clone());

        assert!(h.refresh().await.is_err());
        let state = h.load_state();
        assert!(!state.loading);
        assert!(state.error.is_some());

        api.fail_fetch.store(false, Ordering::SeqCst);
        h.refresh().await.unwrap();
        assert!(h.load_state().error.is_none());
    }

    #[tokio::test]
    async fn test_load_states_follow_refresh() {
        let api = Arc::new(FakeApi::default());
        let h = handle(api);
        let mut states = h.load_states();
        assert!(states.borrow_and_update().loading);

        h.refresh().await.unwrap();
        assert!(states.has_changed().unwrap());
        assert_eq!(*states.borrow_and_update(), LoadState::default());
    }

    #[tokio::test]
    async fn test_mark_as_read_twice_calls_backend_once() {
        let api = Arc::new(FakeApi::default());
        let n = notification(false);
        *api.records.lock().unwrap() = vec![n.clone(), notification(false)];
        let h = handle(api.clone());
        h.refresh().await.unwrap();

        h.mark_as_read(n.id).await.unwrap();
        h.mark_as_read(n.id).await.unwrap();

        assert_eq!(h.unread_count(), 1);
        assert_eq!(api.marked.lock().unwrap().as_slice(), &[n.id]);
    }

    #[tokio::test]
    async fn test_mark_as_read_failure_keeps_optimistic_state() {
        let api = Arc::new(FakeApi::default());
        api.fail_mark.store(true, Ordering::SeqCst);
        let n = notification(false);
        *api.records.lock().unwrap() = vec![n.clone()];
        let h = handle(api);
        h.refresh().await.unwrap();

        assert!(h.mark_as_read(n.id).await.is_err());
        assert_eq!(h.unread_count(), 0);
    }

    #[tokio::test]
    async fn test_mark_all_as_read() {
        let api = Arc::new(FakeApi::default());
        *api.records.lock().unwrap() = vec![notification(false), notification(false)];
        let h = handle(api.clone());
        h.refresh().await.unwrap();

        h.mark_all_as_read().await.unwrap();
        assert_eq!(h.unread_count(), 0);
        assert_eq!(*api.mark_all_calls.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_spawn_mark_read_swallows_failures() {
        let api = Arc::new(FakeApi::default());
        api.fail_mark.store(true, Ordering::SeqCst);
        let h = handle(api.clone());
        let ids = vec![NotificationId::new(), NotificationId::new()];

        let task = h.spawn_mark_read(ids.clone()).unwrap();
        task.await.unwrap();
        assert_eq!(api.marked.lock().unwrap().len(), 2);
        assert!(h.spawn_mark_read(Vec::new()).is_none());
    }

    #[tokio::test]
    async fn test_activate_without_user_is_not_live() {
        let h = handle(Arc::new(FakeApi::default()));
        assert_eq!(h.activate().await.unwrap(), Activation::NoUser);
        assert!(!h.is_live());
    }
}
