//! CLI command definitions and dispatch.

pub mod check_in;
pub mod config;
pub mod distance;
pub mod leave;
pub mod notifications;

use clap::{Parser, Subcommand};

use attendance_core::config::AppConfig;
use attendance_core::error::AppError;

use crate::output::OutputFormat;

/// Attendance Hub: check-in validation, leave balances, and notifications
#[derive(Debug, Parser)]
#[command(name = "attendance", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Check whether a position may check in at the office
    CheckIn(check_in::CheckInArgs),
    /// Great-circle distance between two coordinates
    Distance(distance::DistanceArgs),
    /// Render a leave balance bar and badge
    LeaveBalance(leave::LeaveBalanceArgs),
    /// Notification tooling
    Notifications(notifications::NotificationsArgs),
    /// Configuration management
    Config(config::ConfigArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self, app_config: &AppConfig) -> Result<(), AppError> {
        match &self.command {
            Commands::CheckIn(args) => check_in::execute(args, app_config, self.format).await,
            Commands::Distance(args) => distance::execute(args, self.format),
            Commands::LeaveBalance(args) => leave::execute(args, app_config, self.format),
            Commands::Notifications(args) => {
                notifications::execute(args, app_config, self.format).await
            }
            Commands::Config(args) => config::execute(args, &self.config, app_config, self.format),
        }
    }
}
