//! Notification CLI commands.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;
use tracing::{info, warn};

use attendance_core::config::AppConfig;
use attendance_core::error::AppError;
use attendance_core::events::RowChangePayload;
use attendance_core::result::AppResult;
use attendance_core::traits::auth::UserResolver;
use attendance_core::types::id::UserId;
use attendance_core::types::notification::Notification;
use attendance_realtime::{Activation, MemoryChangeFeed, RealtimeSync, SharedStore, StoreSnapshot};

use crate::output::{self, OutputFormat};

/// Arguments for notification commands
#[derive(Debug, Args)]
pub struct NotificationsArgs {
    /// Notification subcommand
    #[command(subcommand)]
    pub command: NotificationsCommand,
}

/// Notification subcommands
#[derive(Debug, Subcommand)]
pub enum NotificationsCommand {
    /// Replay recorded row changes (one JSON payload per line) through the
    /// realtime sync and print the resulting list
    Replay {
        /// JSONL file of row change payloads
        file: PathBuf,
        /// Recipient to subscribe as (defaults to the first payload's user)
        #[arg(short, long)]
        user: Option<UserId>,
        /// JSON array of notifications to start from
        #[arg(short, long)]
        initial: Option<PathBuf>,
    },
}

/// Notification display row
#[derive(Debug, Serialize, Tabled)]
struct NotificationRow {
    /// Notification ID
    id: String,
    /// Title
    title: String,
    /// Category
    category: String,
    /// Read flag
    read: bool,
    /// Created at
    created_at: String,
}

impl From<&Notification> for NotificationRow {
    fn from(n: &Notification) -> Self {
        Self {
            id: n.id.to_string(),
            title: n.title.clone(),
            category: n.category.as_str().to_string(),
            read: n.is_read,
            created_at: n.created_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

/// Outcome of a replay.
#[derive(Debug, Serialize)]
pub struct ReplayReport {
    /// Subscribed recipient.
    pub user_id: UserId,
    /// Change channel the replay subscribed to.
    pub channel: String,
    /// Live receivers on that channel when replay started.
    pub subscribers: usize,
    /// Changes delivered to the store.
    pub applied: usize,
    /// Lines skipped (malformed, deletes, other users or tables).
    pub skipped: usize,
    /// Final store state.
    pub snapshot: StoreSnapshot,
}

#[derive(Debug)]
struct StaticUser(UserId);

#[async_trait]
impl UserResolver for StaticUser {
    async fn current_user(&self) -> AppResult<Option<UserId>> {
        Ok(Some(self.0))
    }
}

/// Execute notification commands
pub async fn execute(
    args: &NotificationsArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    match &args.command {
        NotificationsCommand::Replay {
            file,
            user,
            initial,
        } => {
            let lines = read_lines(file).await?;
            let initial = match initial {
                Some(path) => {
                    let raw = tokio::fs::read_to_string(path).await?;
                    serde_json::from_str::<Vec<Notification>>(&raw)?
                }
                None => Vec::new(),
            };
            let report = replay(config, *user, initial, &lines).await?;

            match format {
                OutputFormat::Json => output::print_json(&report),
                OutputFormat::Table => {
                    let rows: Vec<NotificationRow> = report
                        .snapshot
                        .notifications
                        .iter()
                        .map(NotificationRow::from)
                        .collect();
                    output::print_list(&rows, format);
                    output::print_kv("User", &report.user_id.to_string());
                    output::print_kv("Channel", &report.channel);
                    output::print_kv("Subscribers", &report.subscribers.to_string());
                    output::print_kv("Applied", &report.applied.to_string());
                    output::print_kv("Skipped", &report.skipped.to_string());
                    output::print_kv("Unread", &report.snapshot.unread_count.to_string());
                }
            }
        }
    }
    Ok(())
}

async fn read_lines(path: &Path) -> AppResult<Vec<String>> {
    let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
        AppError::with_source(
            attendance_core::error::ErrorKind::NotFound,
            format!("Cannot read '{}'", path.display()),
            e,
        )
    })?;
    Ok(raw
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect())
}

/// Runs `lines` through a memory change feed into a fresh store.
///
/// Each delivered change is awaited before the next is published, so the
/// result reflects every line in order.
pub async fn replay(
    config: &AppConfig,
    user: Option<UserId>,
    initial: Vec<Notification>,
    lines: &[String],
) -> AppResult<ReplayReport> {
    let mut payloads = Vec::with_capacity(lines.len());
    let mut skipped = 0;
    for (index, line) in lines.iter().enumerate() {
        match serde_json::from_str::<RowChangePayload>(line) {
            Ok(payload) => payloads.push(payload),
            Err(e) => {
                warn!(line = index + 1, error = %e, "Skipping malformed change payload");
                skipped += 1;
            }
        }
    }

    let user_id = match user.or_else(|| payloads.iter().find_map(payload_user)) {
        Some(user_id) => user_id,
        None => {
            return Err(AppError::validation(
                "No recipient given and none found in the payloads",
            ));
        }
    };

    let feed = Arc::new(MemoryChangeFeed::new(&config.realtime));
    let store = SharedStore::new();
    store.write(|s| s.replace_all(initial));
    let mut changes = store.changes();
    let base = *changes.borrow();

    let sync = RealtimeSync::new(
        Arc::new(StaticUser(user_id)),
        feed.clone(),
        store.clone(),
        config.realtime.clone(),
    );
    let channel = match sync.activate().await? {
        Activation::Subscribed(filter) => filter.channel_name(),
        other => {
            return Err(AppError::realtime(format!(
                "Replay subscription not established: {other:?}"
            )));
        }
    };
    let subscribers = feed.subscriber_count(user_id).await;
    info!(%channel, subscribers, "Replaying changes");

    let wait = Duration::from_secs(config.realtime.subscribe_timeout_seconds);
    let mut applied = 0;
    for payload in payloads {
        match feed.publish_payload(payload).await {
            Ok(0) => skipped += 1,
            Ok(delivered) => {
                applied += delivered;
                let target = base.wrapping_add(applied as u64);
                tokio::time::timeout(wait, changes.wait_for(|v| *v >= target))
                    .await
                    .map_err(|_| AppError::timeout("Replayed change was not applied in time"))?
                    .map_err(|_| AppError::realtime("Notification store closed"))?;
            }
            Err(e) => {
                warn!(error = %e, "Skipping undecodable change payload");
                skipped += 1;
            }
        }
    }
    sync.deactivate();

    Ok(ReplayReport {
        user_id,
        channel,
        subscribers,
        applied,
        skipped,
        snapshot: store.snapshot(),
    })
}

fn payload_user(payload: &RowChangePayload) -> Option<UserId> {
    payload
        .new
        .as_ref()?
        .get("user_id")?
        .as_str()?
        .parse()
        .ok()
}
