//! Leave balance CLI command.

use clap::{Args, ValueEnum};
use serde::Serialize;
use tabled::Tabled;

use attendance_core::config::AppConfig;
use attendance_core::config::leave::TierPolicy;
use attendance_core::error::AppError;
use attendance_service::{LeaveBalanceIndicator, TierClassifier};

use crate::output::{self, OutputFormat};

/// Tier policy override
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PolicyArg {
    /// Tier from filled bar slots
    FilledBars,
    /// Tier from the remaining ratio
    Ratio,
}

impl From<PolicyArg> for TierPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::FilledBars => TierPolicy::FilledBars,
            PolicyArg::Ratio => TierPolicy::Ratio,
        }
    }
}

/// Arguments for the leave-balance command
#[derive(Debug, Args)]
pub struct LeaveBalanceArgs {
    /// Remaining days
    #[arg(long)]
    pub current: f64,
    /// Entitled days
    #[arg(long)]
    pub total: f64,
    /// Override the configured tier policy
    #[arg(long, value_enum)]
    pub policy: Option<PolicyArg>,
}

/// Balance display row
#[derive(Debug, Serialize, Tabled)]
struct BalanceRow {
    /// Bar rendering
    bar: String,
    /// Badge text
    badge: String,
    /// Filled slots
    filled: u32,
    /// Tier
    tier: String,
    /// Bar and badge color
    color: String,
}

/// Execute the leave-balance command
pub fn execute(
    args: &LeaveBalanceArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    if args.current < 0.0 {
        return Err(AppError::validation("current balance cannot be negative"));
    }
    let policy = args
        .policy
        .map(TierPolicy::from)
        .unwrap_or(config.leave.tier_policy);
    let indicator = LeaveBalanceIndicator::new(&TierClassifier::new(policy), args.current, args.total);

    match format {
        OutputFormat::Json => output::print_json(&indicator),
        OutputFormat::Table => output::print_record(
            &BalanceRow {
                bar: indicator.render_bar(),
                badge: indicator.badge_label(),
                filled: indicator.filled_bars,
                tier: indicator.tier.as_str().to_string(),
                color: indicator.bar_color().as_str().to_string(),
            },
            format,
        ),
    }
    Ok(())
}
