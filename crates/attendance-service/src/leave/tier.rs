//! Three-tier severity for leave balances.
//!
//! Two rules exist: one on the remaining/total ratio and one on the number
//! of filled bar slots. A [`TierClassifier`] is pinned to a single
//! [`TierPolicy`] and every renderer asks the same classifier, so a bar and
//! its badge cannot disagree.

use serde::Serialize;

use attendance_core::config::leave::TierPolicy;

/// Number of slots in a balance bar.
pub const BAR_SLOTS: u32 = 10;

/// Severity of a remaining balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BalanceTier {
    /// Little left.
    Low,
    /// About half left.
    Medium,
    /// Plenty left.
    High,
}

/// Display color for a tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TierColor {
    /// Low.
    Red,
    /// Medium.
    Amber,
    /// High.
    Green,
}

impl TierColor {
    /// Lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Red => "red",
            Self::Amber => "amber",
            Self::Green => "green",
        }
    }
}

impl BalanceTier {
    /// Color used by bars and badges.
    pub fn color(self) -> TierColor {
        match self {
            Self::Low => TierColor::Red,
            Self::Medium => TierColor::Amber,
            Self::High => TierColor::Green,
        }
    }

    /// Tier from a remaining/total ratio. A zero total counts as low.
    pub fn from_ratio(current: f64, total: f64) -> Self {
        if total <= 0.0 || !total.is_finite() || !current.is_finite() {
            return Self::Low;
        }
        let ratio = current / total;
        if ratio <= 0.25 {
            Self::Low
        } else if ratio <= 0.50 {
            Self::Medium
        } else {
            Self::High
        }
    }

    /// Tier from a filled-slot count.
    pub fn from_filled_bars(filled: u32) -> Self {
        match filled {
            0..=2 => Self::Low,
            3..=5 => Self::Medium,
            _ => Self::High,
        }
    }

    /// Lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

/// Number of filled slots (out of [`BAR_SLOTS`]) for a balance.
///
/// Zero only for an empty balance, all slots only for a full one, and at
/// least one slot for any non-empty balance. Over-full balances clamp to all
/// slots; a non-positive or non-finite total shows nothing.
pub fn filled_bars(current: f64, total: f64) -> u32 {
    if !current.is_finite() || !total.is_finite() || current <= 0.0 || total <= 0.0 {
        return 0;
    }
    if current >= total {
        return BAR_SLOTS;
    }
    let scaled = ((current / total) * f64::from(BAR_SLOTS)).floor() as u32;
    scaled.clamp(1, BAR_SLOTS - 1)
}

/// Classifies balances with one canonical policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TierClassifier {
    policy: TierPolicy,
}

impl TierClassifier {
    /// Creates a classifier pinned to `policy`.
    pub fn new(policy: TierPolicy) -> Self {
        Self { policy }
    }

    /// The policy in use.
    pub fn policy(&self) -> TierPolicy {
        self.policy
    }

    /// Tier for a balance.
    pub fn classify(&self, current: f64, total: f64) -> BalanceTier {
        match self.policy {
            TierPolicy::FilledBars => BalanceTier::from_filled_bars(filled_bars(current, total)),
            TierPolicy::Ratio => BalanceTier::from_ratio(current, total),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_of_ten_is_low_under_both_policies() {
        assert_eq!(filled_bars(2.0, 10.0), 2);
        assert_eq!(BalanceTier::from_ratio(2.0, 10.0), BalanceTier::Low);
        assert_eq!(
            TierClassifier::new(TierPolicy::FilledBars).classify(2.0, 10.0),
            BalanceTier::Low
        );
        assert_eq!(
            TierClassifier::new(TierPolicy::Ratio).classify(2.0, 10.0),
            BalanceTier::Low
        );
    }

    #[test]
    fn test_filled_bars_extremes() {
        assert_eq!(filled_bars(0.0, 12.0), 0);
        assert_eq!(filled_bars(12.0, 12.0), 10);
        assert_eq!(filled_bars(0.5, 12.0), 1);
        assert_eq!(filled_bars(11.9, 12.0), 9);
        assert_eq!(filled_bars(15.0, 12.0), 10);
        assert_eq!(filled_bars(3.0, 0.0), 0);
    }

    #[test]
    fn test_filled_bars_monotonic_and_bounded() {
        for total in 1..=30u32 {
            let total = f64::from(total);
            let mut previous = 0;
            for step in 0..=(total as u32 * 2) {
                let current = f64::from(step) / 2.0;
                let filled = filled_bars(current, total);
                assert!(filled <= BAR_SLOTS);
                assert!(filled >= previous, "not monotonic at {current}/{total}");
                assert_eq!(filled == 0, current == 0.0);
                assert_eq!(filled == BAR_SLOTS, current == total);
                previous = filled;
            }
        }
    }

    #[test]
    fn test_ratio_thresholds() {
        assert_eq!(BalanceTier::from_ratio(0.0, 0.0), BalanceTier::Low);
        assert_eq!(BalanceTier::from_ratio(5.0, 20.0), BalanceTier::Low);
        assert_eq!(BalanceTier::from_ratio(6.0, 20.0), BalanceTier::Medium);
        assert_eq!(BalanceTier::from_ratio(10.0, 20.0), BalanceTier::Medium);
        assert_eq!(BalanceTier::from_ratio(11.0, 20.0), BalanceTier::High);
    }

    #[test]
    fn test_bar_thresholds() {
        assert_eq!(BalanceTier::from_filled_bars(2), BalanceTier::Low);
        assert_eq!(BalanceTier::from_filled_bars(3), BalanceTier::Medium);
        assert_eq!(BalanceTier::from_filled_bars(5), BalanceTier::Medium);
        assert_eq!(BalanceTier::from_filled_bars(6), BalanceTier::High);
    }

    #[test]
    fn test_policies_disagree_at_twenty_six_percent() {
        // 26% remaining: ratio says medium, two filled bars say low.
        assert_eq!(BalanceTier::from_ratio(26.0, 100.0), BalanceTier::Medium);
        assert_eq!(
            BalanceTier::from_filled_bars(filled_bars(26.0, 100.0)),
            BalanceTier::Low
        );
    }

    #[test]
    fn test_colors() {
        assert_eq!(BalanceTier::Low.color(), TierColor::Red);
        assert_eq!(BalanceTier::Medium.color(), TierColor::Amber);
        assert_eq!(BalanceTier::High.color(), TierColor::Green);
    }
}
