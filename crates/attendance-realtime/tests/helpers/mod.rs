//! Shared fixtures for notification flow tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use std::time::Duration;
use tokio::sync::watch;

use attendance_core::config::realtime::RealtimeConfig;
use attendance_core::error::AppError;
use attendance_core::events::{NotificationChange, PreviousRow};
use attendance_core::result::AppResult;
use attendance_core::traits::auth::UserResolver;
use attendance_core::traits::leave::LeaveRequestSource;
use attendance_core::traits::notification::NotificationApi;
use attendance_core::types::id::{LeaveRequestId, NotificationId, UserId};
use attendance_core::types::leave::{LeaveRequestDetail, LeaveStatus};
use attendance_core::types::notification::{Notification, NotificationCategory};
use attendance_realtime::{MemoryChangeFeed, NotificationListView, NotificationsHandle};

/// Backend double: a notifications table that echoes writes to the feed.
#[derive(Debug)]
pub struct TestBackend {
    pub user: UserId,
    pub rows: Mutex<Vec<Notification>>,
    pub marked: Mutex<Vec<NotificationId>>,
    pub feed: Arc<MemoryChangeFeed>,
    pub fail_fetch: AtomicBool,
}

impl TestBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            user: UserId::new(),
            rows: Mutex::new(Vec::new()),
            marked: Mutex::new(Vec::new()),
            feed: Arc::new(MemoryChangeFeed::new(&RealtimeConfig::default())),
            fail_fetch: AtomicBool::new(false),
        })
    }

    /// Seeds a row without emitting a change.
    pub fn seed(&self, title: &str, is_read: bool) -> Notification {
        let record = Notification {
            id: NotificationId::new(),
            user_id: self.user,
            title: title.to_string(),
            description: format!("{title} details"),
            category: NotificationCategory::Announcement,
            is_read,
            created_at: Utc::now(),
            related_entity_type: None,
            related_entity_id: None,
        };
        self.rows.lock().unwrap().insert(0, record.clone());
        record
    }

    /// Inserts a row and publishes the insert.
    pub async fn create(&self, title: &str) -> Notification {
        let record = self.seed(title, false);
        self.feed
            .publish(NotificationChange::Insert {
                record: record.clone(),
            })
            .await;
        record
    }

    /// Flips a row's read flag and publishes the update.
    pub async fn set_read(&self, id: NotificationId, is_read: bool) {
        let (old, new) = {
            let mut rows = self.rows.lock().unwrap();
            let row = rows.iter_mut().find(|n| n.id == id).unwrap();
            let old = PreviousRow {
                id,
                is_read: Some(row.is_read),
            };
            row.is_read = is_read;
            (old, row.clone())
        };
        self.feed.publish(NotificationChange::Update { old, new }).await;
    }

    pub fn marked(&self) -> Vec<NotificationId> {
        let mut ids = self.marked.lock().unwrap().clone();
        ids.sort();
        ids
    }

    pub fn handle(self: &Arc<Self>) -> NotificationsHandle {
        NotificationsHandle::new(
            self.clone(),
            self.clone(),
            self.feed.clone(),
            &RealtimeConfig::default(),
        )
    }

    pub fn list_view(self: &Arc<Self>) -> NotificationListView {
        NotificationListView::new(self.handle(), self.clone())
    }
}

#[async_trait]
impl NotificationApi for TestBackend {
    async fn fetch_notifications(&self) -> AppResult<Vec<Notification>> {
        if self.fail_fetch.load(Ordering::SeqCst) {
            return Err(AppError::backend("notifications unavailable"));
        }
        Ok(self.rows.lock().unwrap().clone())
    }

    async fn mark_read(&self, id: NotificationId) -> AppResult<()> {
        self.marked.lock().unwrap().push(id);
        Ok(())
    }

    async fn mark_all_read(&self) -> AppResult<()> {
        for row in self.rows.lock().unwrap().iter_mut() {
            row.is_read = true;
        }
        Ok(())
    }
}

#[async_trait]
impl UserResolver for TestBackend {
    async fn current_user(&self) -> AppResult<Option<UserId>> {
        Ok(Some(self.user))
    }
}

#[async_trait]
impl LeaveRequestSource for TestBackend {
    async fn fetch_leave_request(&self, id: LeaveRequestId) -> AppResult<LeaveRequestDetail> {
        let start = NaiveDate::from_ymd_opt(2026, 4, 6)
            .ok_or_else(|| AppError::internal("bad fixture date"))?;
        Ok(LeaveRequestDetail {
            id,
            start_date: start,
            end_date: start,
            status: LeaveStatus::Pending,
            reason: None,
        })
    }
}

/// Waits for the next store write seen by `changes`.
pub async fn next_write(changes: &mut watch::Receiver<u64>) {
    tokio::time::timeout(Duration::from_secs(1), changes.changed())
        .await
        .expect("store write within a second")
        .expect("store alive");
}

/// Polls `check` until it holds, for at most a second.
pub async fn eventually(mut check: impl FnMut() -> bool) {
    tokio::time::timeout(Duration::from_secs(1), async {
        while !check() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("condition within a second");
}
