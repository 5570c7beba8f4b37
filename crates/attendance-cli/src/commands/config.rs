//! Configuration management CLI commands.

use clap::{Args, Subcommand};

use attendance_core::config::AppConfig;
use attendance_core::error::AppError;

use crate::output::{self, OutputFormat};

/// Arguments for config commands
#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Config subcommand
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration (file plus environment)
    Show,
    /// Validate the configuration file
    Validate,
}

/// Execute config commands
pub fn execute(
    args: &ConfigArgs,
    config_path: &str,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    match &args.command {
        ConfigCommand::Show => match format {
            OutputFormat::Json => output::print_json(config),
            OutputFormat::Table => print_summary(config),
        },
        ConfigCommand::Validate => {
            config.validate()?;
            output::print_success(&format!("Configuration '{config_path}' is valid"));
            print_summary(config);
        }
    }
    Ok(())
}

fn print_summary(config: &AppConfig) {
    output::print_kv(
        "Logging",
        &format!("{} ({})", config.logging.level, config.logging.format),
    );
    output::print_kv(
        "Realtime",
        &format!(
            "{}.{} (buffer {}, timeout {}s)",
            config.realtime.schema,
            config.realtime.table,
            config.realtime.channel_buffer_size,
            config.realtime.subscribe_timeout_seconds
        ),
    );
    output::print_kv(
        "Office",
        &format!(
            "{}, {} r={} m{}",
            config.office.latitude,
            config.office.longitude,
            config.office.radius_meters,
            config
                .office
                .label
                .as_deref()
                .map(|l| format!(" [{l}]"))
                .unwrap_or_default()
        ),
    );
    output::print_kv("Leave tier policy", &format!("{:?}", config.leave.tier_policy));
    output::print_kv(
        "Profile cache",
        &format!(
            "ttl {}s, max {}",
            config.cache.profile_ttl_seconds, config.cache.max_entries
        ),
    );
}
