//! Bar and badge view model for a leave balance.

use serde::Serialize;

use super::tier::{BAR_SLOTS, BalanceTier, TierClassifier, TierColor, filled_bars};

/// Everything a balance bar and its badge need, classified once.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaveBalanceIndicator {
    /// Remaining days.
    pub current: f64,
    /// Entitled days.
    pub total: f64,
    /// Filled bar slots.
    pub filled_bars: u32,
    /// Severity shared by bar and badge.
    pub tier: BalanceTier,
}

impl LeaveBalanceIndicator {
    /// Builds the indicator for a balance.
    pub fn new(classifier: &TierClassifier, current: f64, total: f64) -> Self {
        Self {
            current,
            total,
            filled_bars: filled_bars(current, total),
            tier: classifier.classify(current, total),
        }
    }

    /// Fill state of each slot, left to right.
    pub fn slots(&self) -> Vec<bool> {
        (0..BAR_SLOTS).map(|i| i < self.filled_bars).collect()
    }

    /// Color of the filled bar slots.
    pub fn bar_color(&self) -> TierColor {
        self.tier.color()
    }

    /// Color of the numeric badge.
    pub fn badge_color(&self) -> TierColor {
        self.tier.color()
    }

    /// Badge text, e.g. `"2/10"` or `"1.5/12"`.
    pub fn badge_label(&self) -> String {
        format!("{}/{}", format_days(self.current), format_days(self.total))
    }

    /// Text rendering of the bar.
    pub fn render_bar(&self) -> String {
        self.slots()
            .into_iter()
            .map(|filled| if filled { '█' } else { '░' })
            .collect()
    }
}

fn format_days(days: f64) -> String {
    if days.fract() == 0.0 {
        format!("{days:.0}")
    } else {
        format!("{days:.1}")
    }
}
