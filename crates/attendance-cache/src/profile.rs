//! Cached profile lookups.

use std::sync::Arc;

use chrono::Duration;
use tracing::{debug, warn};

use attendance_core::config::cache::CacheConfig;
use attendance_core::result::AppResult;
use attendance_core::traits::clock::Clock;
use attendance_core::traits::profile::ProfileSource;
use attendance_core::types::id::UserId;
use attendance_core::types::profile::UserProfile;

use crate::ttl::TtlCache;

/// Profile lookups backed by a [`ProfileSource`] and fronted by a [`TtlCache`].
///
/// Only found profiles are cached; a missing row is looked up again next time.
#[derive(Debug, Clone)]
pub struct ProfileDirectory {
    source: Arc<dyn ProfileSource>,
    cache: TtlCache<UserId, UserProfile>,
}

impl ProfileDirectory {
    /// Creates a directory using the cache settings from configuration.
    pub fn new(source: Arc<dyn ProfileSource>, config: &CacheConfig, clock: Arc<dyn Clock>) -> Self {
        let ttl = i64::try_from(config.profile_ttl_seconds)
            .ok()
            .and_then(Duration::try_seconds)
            .unwrap_or(Duration::MAX);
        Self {
            source,
            cache: TtlCache::new(ttl, config.max_entries, clock),
        }
    }

    /// Returns the profile for `user_id`, fetching it on a cache miss.
    pub async fn get(&self, user_id: UserId) -> AppResult<Option<UserProfile>> {
        if let Some(profile) = self.cache.get(&user_id) {
            debug!(%user_id, "Profile cache hit");
            return Ok(Some(profile));
        }

        match self.source.fetch_profile(user_id).await {
            Ok(Some(profile)) => {
                self.cache.insert(user_id, profile.clone());
                Ok(Some(profile))
            }
            Ok(None) => Ok(None),
            Err(e) => {
                warn!(%user_id, error = %e, "Profile lookup failed");
                Err(e)
            }
        }
    }

    /// Drops the cached profile so the next lookup hits the backend.
    pub fn invalidate(&self, user_id: UserId) {
        self.cache.invalidate(&user_id);
    }

    /// Drops every cached profile (e.g. on sign-out).
    pub fn clear(&self) {
        self.cache.clear();
    }

    /// Removes expired profiles.
    pub fn purge_expired(&self) -> usize {
        self.cache.purge_expired()
    }
}
