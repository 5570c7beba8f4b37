//! Fallback office location configuration.

use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::types::geo::{Coordinates, OfficeLocation};

/// The office used when no office record can be looked up.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OfficeConfig {
    /// Office latitude in degrees.
    #[serde(default = "default_latitude")]
    pub latitude: f64,
    /// Office longitude in degrees.
    #[serde(default = "default_longitude")]
    pub longitude: f64,
    /// Check-in radius in meters.
    #[serde(default = "default_radius")]
    pub radius_meters: f64,
    /// Display label.
    #[serde(default)]
    pub label: Option<String>,
}

impl Default for OfficeConfig {
    fn default() -> Self {
        Self {
            latitude: default_latitude(),
            longitude: default_longitude(),
            radius_meters: default_radius(),
            label: Some("Head office".to_string()),
        }
    }
}

impl OfficeConfig {
    /// Converts the configured values into an office location.
    pub fn to_location(&self) -> OfficeLocation {
        OfficeLocation {
            coordinates: Coordinates::new(self.latitude, self.longitude),
            radius_meters: Some(self.radius_meters),
            label: self.label.clone(),
        }
    }

    /// Rejects an unusable fallback office at load time.
    pub fn validate(&self) -> Result<(), AppError> {
        Coordinates::new(self.latitude, self.longitude)
            .ensure_valid()
            .map_err(|e| AppError::configuration(format!("office: {}", e.message)))?;
        if !self.radius_meters.is_finite() || self.radius_meters <= 0.0 {
            return Err(AppError::configuration(
                "office.radius_meters must be a positive number",
            ));
        }
        Ok(())
    }
}

fn default_latitude() -> f64 {
    -6.200_000
}

fn default_longitude() -> f64 {
    106.816_666
}

fn default_radius() -> f64 {
    crate::types::geo::DEFAULT_RADIUS_METERS
}
