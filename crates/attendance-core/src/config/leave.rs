//! Leave balance rendering configuration.

use serde::{Deserialize, Serialize};

/// Which classification rule decides the severity tier of a leave balance.
///
/// Bars and badges always read the tier from the same policy so their
/// colors never disagree for the same balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TierPolicy {
    /// Tier from the number of filled bar slots (out of 10).
    #[default]
    FilledBars,
    /// Tier from the remaining/total ratio.
    Ratio,
}

/// Leave balance settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LeaveConfig {
    /// Canonical tier policy.
    #[serde(default)]
    pub tier_policy: TierPolicy,
}
