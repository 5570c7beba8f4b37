//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section, and every section has serde defaults so an empty file (or no
//! file at all) yields a working configuration.

pub mod cache;
pub mod leave;
pub mod logging;
pub mod office;
pub mod realtime;

use serde::{Deserialize, Serialize};

use self::cache::CacheConfig;
use self::leave::LeaveConfig;
use self::logging::LoggingConfig;
use self::office::OfficeConfig;
use self::realtime::RealtimeConfig;

use crate::error::AppError;

/// Prefix for environment variable overrides (`ATTENDANCE__OFFICE__RADIUS_METERS=80`).
pub const ENV_PREFIX: &str = "ATTENDANCE";

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Real-time change feed settings.
    #[serde(default)]
    pub realtime: RealtimeConfig,
    /// Fallback office location for check-in validation.
    #[serde(default)]
    pub office: OfficeConfig,
    /// Leave balance rendering settings.
    #[serde(default)]
    pub leave: LeaveConfig,
    /// Profile cache settings.
    #[serde(default)]
    pub cache: CacheConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    ///
    /// The file is optional. Environment variables prefixed with
    /// `ATTENDANCE__` are layered on top.
    pub fn load(path: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let parsed: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;

        parsed.validate()?;
        Ok(parsed)
    }

    /// Check cross-field constraints that serde cannot express.
    pub fn validate(&self) -> Result<(), AppError> {
        self.office.validate()?;
        if self.realtime.channel_buffer_size == 0 {
            return Err(AppError::configuration(
                "realtime.channel_buffer_size must be greater than zero",
            ));
        }
        if self.cache.profile_ttl_seconds == 0 {
            return Err(AppError::configuration(
                "cache.profile_ttl_seconds must be greater than zero",
            ));
        }
        if self.cache.profile_ttl_seconds > cache::MAX_PROFILE_TTL_SECONDS {
            return Err(AppError::configuration(format!(
                "cache.profile_ttl_seconds must be at most {}",
                cache::MAX_PROFILE_TTL_SECONDS
            )));
        }
        Ok(())
    }
}
