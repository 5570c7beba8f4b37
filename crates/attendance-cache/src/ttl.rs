//! Keyed in-memory cache with per-entry expiry.

use std::hash::Hash;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use tracing::debug;

use attendance_core::traits::clock::Clock;

#[derive(Debug, Clone)]
struct Entry<V> {
    value: V,
    inserted_at: DateTime<Utc>,
    /// `None` when the TTL reaches past the representable range.
    expires_at: Option<DateTime<Utc>>,
}

impl<V> Entry<V> {
    fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_none_or(|at| at > now)
    }
}

/// A concurrent cache whose entries expire `ttl` after insertion.
///
/// Expired entries are treated as absent on read and removed lazily, or in
/// bulk with [`TtlCache::purge_expired`]. When the cache is full, expired
/// entries are purged first and then the oldest entry is evicted.
#[derive(Debug, Clone)]
pub struct TtlCache<K, V>
where
    K: Eq + Hash,
{
    entries: Arc<DashMap<K, Entry<V>>>,
    ttl: Duration,
    max_entries: usize,
    clock: Arc<dyn Clock>,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Clone + std::fmt::Debug,
    V: Clone,
{
    /// Creates an empty cache.
    pub fn new(ttl: Duration, max_entries: usize, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            ttl,
            max_entries: max_entries.max(1),
            clock,
        }
    }

    /// Returns the live value for `key`, dropping it if it has expired.
    pub fn get(&self, key: &K) -> Option<V> {
        let now = self.clock.now();
        let expired = match self.entries.get(key) {
            Some(entry) if entry.is_live(now) => return Some(entry.value.clone()),
            Some(_) => true,
            None => false,
        };
        if expired {
            self.entries.remove_if(key, |_, e| !e.is_live(now));
            debug!(?key, "Cache entry expired");
        }
        None
    }

    /// Inserts or replaces `key`, restarting its TTL.
    ///
    /// A TTL that overflows the clock never expires.
    pub fn insert(&self, key: K, value: V) {
        if !self.entries.contains_key(&key) && self.entries.len() >= self.max_entries {
            self.make_room();
        }
        let now = self.clock.now();
        self.entries.insert(
            key,
            Entry {
                value,
                inserted_at: now,
                expires_at: now.checked_add_signed(self.ttl),
            },
        );
    }

    /// Removes `key`. Returns `true` if a live or expired entry was present.
    pub fn invalidate(&self, key: &K) -> bool {
        self.entries.remove(key).is_some()
    }

    /// Removes every entry.
    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Removes every expired entry and returns how many were dropped.
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let before = self.entries.len();
        self.entries.retain(|_, e| e.is_live(now));
        let purged = before.saturating_sub(self.entries.len());
        if purged > 0 {
            debug!(purged, "Purged expired cache entries");
        }
        purged
    }

    /// Number of stored entries, including expired ones not yet purged.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn make_room(&self) {
        if self.purge_expired() > 0 {
            return;
        }
        let oldest = self
            .entries
            .iter()
            .min_by_key(|e| e.value().inserted_at)
            .map(|e| e.key().clone());
        if let Some(key) = oldest {
            self.entries.remove(&key);
            debug!(?key, "Evicted oldest cache entry");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use attendance_core::traits::clock::ManualClock;

    fn make_cache(max: usize) -> (TtlCache<String, u32>, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let cache = TtlCache::new(Duration::seconds(60), max, clock.clone());
        (cache, clock)
    }

    #[test]
    fn test_set_get() {
        let (cache, _) = make_cache(10);
        cache.insert("a".into(), 1);
        assert_eq!(cache.get(&"a".to_string()), Some(1));
        assert_eq!(cache.get(&"missing".to_string()), None);
    }

    #[test]
    fn test_expiry_follows_clock() {
        let (cache, clock) = make_cache(10);
        cache.insert("a".into(), 1);
        clock.advance(Duration::seconds(59));
        assert_eq!(cache.get(&"a".to_string()), Some(1));
        clock.advance(Duration::seconds(1));
        assert_eq!(cache.get(&"a".to_string()), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_reinsert_restarts_ttl() {
        let (cache, clock) = make_cache(10);
        cache.insert("a".into(), 1);
        clock.advance(Duration::seconds(45));
        cache.insert("a".into(), 2);
        clock.advance(Duration::seconds(45));
        assert_eq!(cache.get(&"a".to_string()), Some(2));
    }

    #[test]
    fn test_invalidate() {
        let (cache, _) = make_cache(10);
        cache.insert("a".into(), 1);
        assert!(cache.invalidate(&"a".to_string()));
        assert!(!cache.invalidate(&"a".to_string()));
        assert_eq!(cache.get(&"a".to_string()), None);
    }

    #[test]
    fn test_purge_expired() {
        let (cache, clock) = make_cache(10);
        cache.insert("a".into(), 1);
        clock.advance(Duration::seconds(30));
        cache.insert("b".into(), 2);
        clock.advance(Duration::seconds(31));
        assert_eq!(cache.purge_expired(), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_full_cache_evicts_oldest() {
        let (cache, clock) = make_cache(2);
        cache.insert("a".into(), 1);
        clock.advance(Duration::seconds(1));
        cache.insert("b".into(), 2);
        clock.advance(Duration::seconds(1));
        cache.insert("c".into(), 3);
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(&"a".to_string()), None);
        assert_eq!(cache.get(&"c".to_string()), Some(3));
    }

    #[test]
    fn test_overflowing_ttl_never_expires() {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let cache = TtlCache::new(Duration::MAX, 10, clock.clone());
        cache.insert("a".to_string(), 1);
        clock.advance(Duration::days(365 * 100));
        assert_eq!(cache.get(&"a".to_string()), Some(1));
        assert_eq!(cache.purge_expired(), 0);
    }
}
