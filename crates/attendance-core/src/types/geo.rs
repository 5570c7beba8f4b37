//! Geographic coordinates and office locations.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::AppError;

/// Check-in radius used when an office has none configured.
pub const DEFAULT_RADIUS_METERS: f64 = 50.0;

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
pub struct Coordinates {
    /// Latitude in degrees, `[-90, 90]`.
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,
    /// Longitude in degrees, `[-180, 180]`.
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
}

impl Coordinates {
    /// Creates a coordinate pair without validating it.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Returns a validation error unless both components are finite and in range.
    ///
    /// NaN compares false against every bound, so finiteness is checked
    /// before the range rules.
    pub fn ensure_valid(&self) -> Result<(), AppError> {
        if !self.latitude.is_finite() || !self.longitude.is_finite() {
            return Err(AppError::validation(format!(
                "coordinates must be finite numbers (got {}, {})",
                self.latitude, self.longitude
            )));
        }
        self.validate()?;
        Ok(())
    }
}

/// An office check-in point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfficeLocation {
    /// Office position.
    #[serde(flatten)]
    pub coordinates: Coordinates,
    /// Allowed check-in radius in meters; `None` means the default.
    #[serde(default)]
    pub radius_meters: Option<f64>,
    /// Display label.
    #[serde(default)]
    pub label: Option<String>,
}

impl OfficeLocation {
    /// The effective radius, falling back to [`DEFAULT_RADIUS_METERS`].
    pub fn effective_radius(&self) -> f64 {
        match self.radius_meters {
            Some(r) if r.is_finite() && r > 0.0 => r,
            _ => DEFAULT_RADIUS_METERS,
        }
    }
}
