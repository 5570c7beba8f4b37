//! The notifications list screen: open a notification, and flush deferred
//! mark-reads when the screen goes away.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use attendance_core::error::AppError;
use attendance_core::result::AppResult;
use attendance_core::traits::leave::LeaveRequestSource;
use attendance_core::types::id::{LeaveRequestId, NotificationId};
use attendance_core::types::leave::LeaveRequestDetail;
use attendance_core::types::notification::Notification;

use super::notifications::{LoadState, NotificationsHandle};
use crate::store::shared::SharedStore;
use crate::tracking::processing::ProcessingGuard;
use crate::tracking::session::{ReadTrackingSession, TrackingState};

/// A notification opened from the list.
#[derive(Debug, Clone)]
pub struct OpenedNotification {
    /// The record, already marked read.
    pub notification: Notification,
    /// Leave request detail for leave notifications.
    pub leave_request: Option<LeaveRequestDetail>,
    /// Whether this open changed the record from unread to read.
    pub marked_read: bool,
}

/// Result of [`NotificationListView::open`].
#[derive(Debug, Clone)]
pub enum OpenOutcome {
    /// The notification was opened.
    Opened(OpenedNotification),
    /// Another open of the same notification is still running.
    AlreadyProcessing,
}

/// What the unmount flush sent.
#[derive(Debug, Default)]
pub struct FlushReport {
    /// Identifiers submitted as read, sorted.
    pub flushed: Vec<NotificationId>,
    /// The background batch, if one was started.
    pub task: Option<JoinHandle<()>>,
}

#[derive(Debug)]
struct CaptureWatch {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

/// Controller for a mounted notifications list.
///
/// While mounted, every store write and every finished load is offered to
/// the read-tracking session until it captures.
#[derive(Debug)]
pub struct NotificationListView {
    notifications: NotificationsHandle,
    leave_requests: Arc<dyn LeaveRequestSource>,
    session: Arc<Mutex<ReadTrackingSession>>,
    processing: ProcessingGuard,
    capture: Mutex<Option<CaptureWatch>>,
    unmounted: AtomicBool,
}

impl NotificationListView {
    /// Creates an unmounted view.
    pub fn new(notifications: NotificationsHandle, leave_requests: Arc<dyn LeaveRequestSource>) -> Self {
        Self {
            notifications,
            leave_requests,
            session: Arc::new(Mutex::new(ReadTrackingSession::new())),
            processing: ProcessingGuard::new(),
            capture: Mutex::new(None),
            unmounted: AtomicBool::new(false),
        }
    }

    /// Starts live updates, loads the list, and captures the unread set.
    ///
    /// A realtime failure only disables live updates. A fetch failure is
    /// returned and leaves the session waiting for a later load.
    pub async fn mount(&self) -> AppResult<()> {
        self.start_capture_watch();
        if let Err(e) = self.notifications.activate().await {
            warn!(error = %e, "Continuing without live notification updates");
        }
        let loaded = self.notifications.refresh().await;
        self.observe_load();
        loaded
    }

    /// Refetches the list and offers the result to the read-tracking session.
    pub async fn refresh(&self) -> AppResult<()> {
        let loaded = self.notifications.refresh().await;
        self.observe_load();
        loaded
    }

    /// Offers the current list to the read-tracking session.
    ///
    /// Returns `true` on the load that captures the unread set.
    pub fn observe_load(&self) -> bool {
        try_capture(
            &self.session,
            self.notifications.store(),
            self.notifications.is_loading(),
        )
    }

    /// Opens a notification.
    ///
    /// An unread notification is marked read locally and on the backend,
    /// and dropped from the deferred flush set. Leave notifications also
    /// fetch the related leave request.
    pub async fn open(&self, id: NotificationId) -> AppResult<OpenOutcome> {
        let Some(_ticket) = self.processing.try_begin(id) else {
            debug!(%id, "Notification already being opened");
            return Ok(OpenOutcome::AlreadyProcessing);
        };

        let store = self.notifications.store();
        let mut notification = store
            .read(|s| s.get(id).cloned())
            .ok_or_else(|| AppError::not_found(format!("Notification {id} not found")))?;

        let marked_read = store.write(|s| s.mark_read(&[id])) > 0;
        if marked_read {
            self.notifications.spawn_mark_read(vec![id]);
        }
        self.lock_session().on_click(id);
        notification.is_read = true;

        let leave_request = match notification.related_entity_id {
            Some(entity_id) if notification.category.is_leave_related() => {
                let request_id = LeaveRequestId::from_uuid(entity_id);
                let detail = self
                    .leave_requests
                    .fetch_leave_request(request_id)
                    .await
                    .inspect_err(|e| {
                        warn!(%id, %request_id, error = %e, "Failed to load leave request detail");
                    })?;
                Some(detail)
            }
            _ => None,
        };

        Ok(OpenOutcome::Opened(OpenedNotification {
            notification,
            leave_request,
            marked_read,
        }))
    }

    /// Marks everything read immediately.
    pub async fn mark_all_as_read(&self) -> AppResult<()> {
        self.notifications.mark_all_as_read().await
    }

    /// Stops live updates and submits every unread notification the user
    /// saw but did not open. Only the first call does anything.
    pub fn unmount(&self) -> FlushReport {
        if self.unmounted.swap(true, Ordering::AcqRel) {
            return FlushReport::default();
        }
        self.stop_capture_watch();
        self.notifications.deactivate();
        self.observe_load();

        let flushed = self.lock_session().flush();
        if flushed.is_empty() {
            return FlushReport::default();
        }
        self.notifications
            .store()
            .write(|s| s.mark_read(&flushed));
        info!(count = flushed.len(), "Flushing deferred mark-read");
        let task = self.notifications.spawn_mark_read(flushed.clone());
        FlushReport { flushed, task }
    }

    /// Read-tracking state.
    pub fn tracking_state(&self) -> TrackingState {
        self.lock_session().state()
    }

    /// Identifiers still waiting for the flush, sorted.
    pub fn pending(&self) -> Vec<NotificationId> {
        let mut ids: Vec<_> = self.lock_session().pending().iter().copied().collect();
        ids.sort();
        ids
    }

    /// The notification state behind this view.
    pub fn notifications(&self) -> &NotificationsHandle {
        &self.notifications
    }

    fn lock_session(&self) -> MutexGuard<'_, ReadTrackingSession> {
        lock_session(&self.session)
    }

    fn start_capture_watch(&self) {
        let Ok(runtime) = Handle::try_current() else {
            warn!("No runtime available, unread set is only captured on explicit loads");
            return;
        };
        let mut capture = self.capture.lock().unwrap_or_else(|e| e.into_inner());
        if capture.is_some() {
            return;
        }
        let cancel = CancellationToken::new();
        let task = runtime.spawn(watch_for_capture(
            self.session.clone(),
            self.notifications.store().clone(),
            self.notifications.changes(),
            self.notifications.load_states(),
            cancel.clone(),
        ));
        *capture = Some(CaptureWatch { cancel, task });
    }

    fn stop_capture_watch(&self) {
        let running = self.capture.lock().unwrap_or_else(|e| e.into_inner()).take();
        if let Some(running) = running {
            running.cancel.cancel();
            running.task.abort();
        }
    }
}

fn lock_session(session: &Mutex<ReadTrackingSession>) -> MutexGuard<'_, ReadTrackingSession> {
    session.lock().unwrap_or_else(|e| e.into_inner())
}

fn try_capture(session: &Mutex<ReadTrackingSession>, store: &SharedStore, loading: bool) -> bool {
    let mut session = lock_session(session);
    store.read(|s| session.observe(loading, s.notifications()))
}

/// Offers the list to the session after every store write or load-state
/// change, and exits once the session has left `Idle`.
async fn watch_for_capture(
    session: Arc<Mutex<ReadTrackingSession>>,
    store: SharedStore,
    mut store_changes: watch::Receiver<u64>,
    mut load_states: watch::Receiver<LoadState>,
    cancel: CancellationToken,
) {
    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            changed = store_changes.changed() => if changed.is_err() { break },
            changed = load_states.changed() => if changed.is_err() { break },
        }
        if lock_session(&session).state() != TrackingState::Idle {
            break;
        }
        let loading = load_states.borrow_and_update().loading;
        if try_capture(&session, &store, loading) {
            debug!("Unread set captured after a later load");
            break;
        }
    }
}

impl Drop for NotificationListView {
    fn drop(&mut self) {
        if !self.unmounted.load(Ordering::Acquire) {
            self.unmount();
        }
        self.stop_capture_watch();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use async_trait::async_trait;
    use attendance_core::config::realtime::RealtimeConfig;
    use attendance_core::traits::auth::UserResolver;
    use attendance_core::traits::notification::NotificationApi;
    use attendance_core::traits::realtime::{ChangeFeed, ChangeStream};
    use attendance_core::types::id::UserId;
    use attendance_core::types::leave::LeaveStatus;
    use chrono::NaiveDate;
    use tokio::sync::broadcast;

    use crate::test_support::{leave_notification, notification};

    #[derive(Debug, Default)]
    struct RecordingApi {
        records: Mutex<Vec<Notification>>,
        marked: Mutex<Vec<NotificationId>>,
        fail_fetch: AtomicBool,
    }

    #[async_trait]
    impl NotificationApi for RecordingApi {
        async fn fetch_notifications(&self) -> AppResult<Vec<Notification>> {
            if self.fail_fetch.load(Ordering::SeqCst) {
                return Err(AppError::backend("fetch failed"));
            }
            Ok(self.records.lock().unwrap().clone())
        }

        async fn mark_read(&self, id: NotificationId) -> AppResult<()> {
            self.marked.lock().unwrap().push(id);
            Ok(())
        }

        async fn mark_all_read(&self) -> AppResult<()> {
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

    #[derive(Debug)]
    struct SlowLeaves;

    #[async_trait]
    impl LeaveRequestSource for SlowLeaves {
        async fn fetch_leave_request(&self, id: LeaveRequestId) -> AppResult<LeaveRequestDetail> {
            tokio::time::sleep(Duration::from_millis(10)).await;
            Ok(LeaveRequestDetail {
                id,
                start_date: NaiveDate::from_ymd_opt(2026, 3, 9).unwrap(),
                end_date: NaiveDate::from_ymd_opt(2026, 3, 11).unwrap(),
                status: LeaveStatus::Approved,
                reason: Some("Family event".to_string()),
            })
        }
    }

    fn view(api: Arc<RecordingApi>) -> NotificationListView {
        let handle = NotificationsHandle::new(
            api,
            Arc::new(NoUser),
            Arc::new(SilentFeed),
            &RealtimeConfig::default(),
        );
        NotificationListView::new(handle, Arc::new(SlowLeaves))
    }

    #[tokio::test]
    async fn test_open_then_unmount_flushes_the_rest() {
        let api = Arc::new(RecordingApi::default());
        let n1 = notification(false);
        let n2 = notification(false);
        let n3 = notification(true);
        *api.records.lock().unwrap() = vec![n1.clone(), n2.clone(), n3];
        let view = view(api.clone());

        view.mount().await.unwrap();
        assert_eq!(view.tracking_state(), TrackingState::Captured);

        let OpenOutcome::Opened(opened) = view.open(n1.id).await.unwrap() else {
            panic!("expected the notification to open");
        };
        assert!(opened.marked_read);
        assert!(opened.notification.is_read);
        assert!(opened.leave_request.is_none());
        assert_eq!(view.pending(), vec![n2.id]);

        let report = view.unmount();
        assert_eq!(report.flushed, vec![n2.id]);
        report.task.unwrap().await.unwrap();
        assert_eq!(view.notifications().unread_count(), 0);

        // Let the click's own mark-read finish too.
        tokio::time::sleep(Duration::from_millis(20)).await;
        let mut marked = api.marked.lock().unwrap().clone();
        marked.sort();
        let mut expected = vec![n1.id, n2.id];
        expected.sort();
        assert_eq!(marked, expected);
    }

    #[tokio::test]
    async fn test_unmount_is_one_shot() {
        let api = Arc::new(RecordingApi::default());
        *api.records.lock().unwrap() = vec![notification(false)];
        let view = view(api);

        view.mount().await.unwrap();
        assert_eq!(view.unmount().flushed.len(), 1);
        assert!(view.unmount().flushed.is_empty());
        assert_eq!(view.tracking_state(), TrackingState::Flushed);
    }

    #[tokio::test]
    async fn test_leave_notification_loads_detail() {
        let api = Arc::new(RecordingApi::default());
        let n = leave_notification(UserId::new(), false);
        *api.records.lock().unwrap() = vec![n.clone()];
        let view = view(api);
        view.mount().await.unwrap();

        let OpenOutcome::Opened(opened) = view.open(n.id).await.unwrap() else {
            panic!("expected the notification to open");
        };
        let detail = opened.leave_request.unwrap();
        assert_eq!(detail.id.into_uuid(), n.related_entity_id.unwrap());
        assert_eq!(detail.day_count(), 3);
    }

    #[tokio::test]
    async fn test_concurrent_open_is_rejected() {
        let api = Arc::new(RecordingApi::default());
        let n = leave_notification(UserId::new(), false);
        *api.records.lock().unwrap() = vec![n.clone()];
        let view = view(api);
        view.mount().await.unwrap();

        let (first, second) = tokio::join!(view.open(n.id), view.open(n.id));
        assert!(matches!(first.unwrap(), OpenOutcome::Opened(_)));
        assert!(matches!(second.unwrap(), OpenOutcome::AlreadyProcessing));
    }

    #[tokio::test]
    async fn test_open_unknown_is_not_found() {
        let view = view(Arc::new(RecordingApi::default()));
        view.mount().await.unwrap();
        let err = view.open(NotificationId::new()).await.unwrap_err();
        assert_eq!(err.kind, attendance_core::error::ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_refresh_after_failed_mount_captures() {
        let api = Arc::new(RecordingApi::default());
        let n = notification(false);
        *api.records.lock().unwrap() = vec![n.clone()];
        api.fail_fetch.store(true, Ordering::SeqCst);
        let view = view(api.clone());

        assert!(view.mount().await.is_err());
        assert_eq!(view.tracking_state(), TrackingState::Idle);

        api.fail_fetch.store(false, Ordering::SeqCst);
        view.refresh().await.unwrap();
        assert_eq!(view.tracking_state(), TrackingState::Captured);
        assert_eq!(view.unmount().flushed, vec![n.id]);
    }

    #[tokio::test]
    async fn test_store_write_after_empty_load_captures() {
        let view = view(Arc::new(RecordingApi::default()));
        view.mount().await.unwrap();
        assert_eq!(view.tracking_state(), TrackingState::Idle);

        let n = notification(false);
        view.notifications()
            .store()
            .write(|s| s.insert_if_absent(n.clone()));
        for _ in 0..100 {
            if view.tracking_state() == TrackingState::Captured {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        assert_eq!(view.tracking_state(), TrackingState::Captured);
        assert_eq!(view.pending(), vec![n.id]);
    }
}
