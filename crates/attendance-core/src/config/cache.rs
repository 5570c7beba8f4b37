//! Profile cache configuration.

use serde::{Deserialize, Serialize};

/// Longest accepted profile TTL: one year.
pub const MAX_PROFILE_TTL_SECONDS: u64 = 365 * 24 * 60 * 60;

/// In-process profile cache settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// How long a cached profile stays valid, in seconds.
    #[serde(default = "default_profile_ttl")]
    pub profile_ttl_seconds: u64,
    /// Maximum number of cached profiles before expired entries are purged
    /// and the oldest entry is evicted.
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            profile_ttl_seconds: default_profile_ttl(),
            max_entries: default_max_entries(),
        }
    }
}

fn default_profile_ttl() -> u64 {
    300
}

fn default_max_entries() -> usize {
    1000
}
