//! Leave balance classification.

pub mod balance;
pub mod tier;

pub use balance::LeaveBalanceIndicator;
pub use tier::{BAR_SLOTS, BalanceTier, TierClassifier, TierColor, filled_bars};
