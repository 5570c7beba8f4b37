//! One change subscription per mounted view.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use attendance_core::config::realtime::RealtimeConfig;
use attendance_core::error::AppError;
use attendance_core::result::AppResult;
use attendance_core::traits::auth::UserResolver;
use attendance_core::traits::realtime::{ChangeFeed, ChangeStream};
use attendance_core::types::id::UserId;

use super::filter::SubscriptionFilter;
use super::reducer::apply_change;
use crate::store::shared::SharedStore;

/// Result of [`RealtimeSync::activate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Activation {
    /// A new subscription is running.
    Subscribed(SubscriptionFilter),
    /// A subscription is already running or being established.
    AlreadySubscribed,
    /// Nobody is signed in; nothing to subscribe to.
    NoUser,
    /// The view was deactivated while the subscription was being set up.
    Cancelled,
}

#[derive(Debug)]
struct ActiveSubscription {
    attempt: u64,
    filter: SubscriptionFilter,
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

/// Ownership of the single subscription slot.
///
/// Every activation gets its own `attempt` number. Only the attempt recorded
/// in `connecting` may install a subscription, and only the subscription's
/// own task may release it when the feed closes.
#[derive(Debug, Default)]
struct SlotState {
    next_attempt: u64,
    connecting: Option<u64>,
    active: Option<ActiveSubscription>,
}

impl SlotState {
    fn is_taken(&self) -> bool {
        self.connecting.is_some() || self.active.is_some()
    }
}

type Slot = Arc<Mutex<SlotState>>;

fn lock_slot(slot: &Mutex<SlotState>) -> MutexGuard<'_, SlotState> {
    slot.lock().unwrap_or_else(|e| e.into_inner())
}

/// Keeps a [`SharedStore`] in sync with the current user's change feed.
///
/// At most one subscription exists at a time. A failed attempt clears the
/// guard so a later activation can try again; there is no automatic
/// reconnect.
#[derive(Debug)]
pub struct RealtimeSync {
    users: Arc<dyn UserResolver>,
    feed: Arc<dyn ChangeFeed>,
    store: SharedStore,
    config: RealtimeConfig,
    slot: Slot,
}

impl RealtimeSync {
    /// Creates an inactive sync.
    pub fn new(
        users: Arc<dyn UserResolver>,
        feed: Arc<dyn ChangeFeed>,
        store: SharedStore,
        config: RealtimeConfig,
    ) -> Self {
        Self {
            users,
            feed,
            store,
            config,
            slot: Arc::new(Mutex::new(SlotState::default())),
        }
    }

    /// Opens the subscription unless one is already open.
    ///
    /// If [`RealtimeSync::deactivate`] runs while this call is connecting,
    /// the new stream is dropped and `Cancelled` is returned.
    pub async fn activate(&self) -> AppResult<Activation> {
        let attempt = {
            let mut slot = lock_slot(&self.slot);
            if slot.is_taken() {
                debug!("Realtime sync already subscribed");
                return Ok(Activation::AlreadySubscribed);
            }
            slot.next_attempt += 1;
            slot.connecting = Some(slot.next_attempt);
            slot.next_attempt
        };

        let user_id = match self.users.current_user().await {
            Ok(Some(user_id)) => user_id,
            Ok(None) => {
                self.release_attempt(attempt);
                debug!("No signed-in user, skipping realtime subscription");
                return Ok(Activation::NoUser);
            }
            Err(e) => {
                self.release_attempt(attempt);
                error!(error = %e, "Failed to resolve user for realtime subscription");
                return Err(e);
            }
        };

        let stream = match self.open_stream(user_id).await {
            Ok(stream) => stream,
            Err(e) => {
                self.release_attempt(attempt);
                error!(%user_id, error = %e, "Realtime subscription failed");
                return Err(e);
            }
        };

        let mut slot = lock_slot(&self.slot);
        if slot.connecting != Some(attempt) {
            // Deactivated while connecting; the stream is dropped here.
            debug!(%user_id, attempt, "Realtime subscription abandoned after deactivation");
            return Ok(Activation::Cancelled);
        }
        slot.connecting = None;
        if let Some(previous) = slot.active.take() {
            previous.cancel.cancel();
            warn!(channel = %previous.filter.channel_name(), "Replaced a running subscription");
        }

        let filter = SubscriptionFilter::for_user(&self.config, user_id);
        let cancel = CancellationToken::new();
        let task = tokio::spawn(run_subscription(
            stream,
            self.store.clone(),
            cancel.clone(),
            self.slot.clone(),
            attempt,
            filter.channel_name(),
        ));
        info!(channel = %filter.channel_name(), "Realtime subscription established");

        slot.active = Some(ActiveSubscription {
            attempt,
            filter: filter.clone(),
            cancel,
            task,
        });
        Ok(Activation::Subscribed(filter))
    }

    /// Tears the subscription down and abandons any attempt in flight.
    ///
    /// Safe to call repeatedly and before any subscription was established.
    /// Returns `true` if a running subscription was stopped.
    pub fn deactivate(&self) -> bool {
        let taken = {
            let mut slot = lock_slot(&self.slot);
            slot.connecting = None;
            slot.active.take()
        };

        match taken {
            Some(active) => {
                active.cancel.cancel();
                info!(channel = %active.filter.channel_name(), "Realtime subscription closed");
                true
            }
            None => false,
        }
    }

    /// Whether a subscription is running or being established.
    pub fn is_subscribed(&self) -> bool {
        lock_slot(&self.slot).is_taken()
    }

    /// The store this sync writes to.
    pub fn store(&self) -> &SharedStore {
        &self.store
    }

    fn release_attempt(&self, attempt: u64) {
        let mut slot = lock_slot(&self.slot);
        if slot.connecting == Some(attempt) {
            slot.connecting = None;
        }
    }

    async fn open_stream(&self, user_id: UserId) -> AppResult<ChangeStream> {
        let timeout = Duration::from_secs(self.config.subscribe_timeout_seconds);
        match tokio::time::timeout(timeout, self.feed.subscribe(user_id)).await {
            Ok(result) => result,
            Err(_) => Err(AppError::timeout(format!(
                "Realtime subscription not established within {}s",
                timeout.as_secs()
            ))),
        }
    }
}

impl Drop for RealtimeSync {
    fn drop(&mut self) {
        let active = lock_slot(&self.slot).active.take();
        if let Some(active) = active {
            active.cancel.cancel();
            active.task.abort();
        }
    }
}

async fn run_subscription(
    mut stream: ChangeStream,
    store: SharedStore,
    cancel: CancellationToken,
    slot: Slot,
    attempt: u64,
    channel: String,
) {
    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            received = stream.recv() => match received {
                Ok(change) => {
                    let outcome = store.write(|s| apply_change(s, change));
                    debug!(%channel, ?outcome, "Change applied");
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!(%channel, skipped, "Change feed lagged, store may be stale until refresh");
                }
                Err(RecvError::Closed) => {
                    warn!(%channel, "Change feed closed");
                    let mut state = lock_slot(&slot);
                    if state.active.as_ref().is_some_and(|a| a.attempt == attempt) {
                        state.active = None;
                    }
                    break;
                }
            }
        }
    }
    debug!(%channel, "Subscription task finished");
}
