//! Decides whether an employee may check in from a reported position.

use serde::Serialize;
use tracing::info;

use attendance_core::result::AppResult;
use attendance_core::types::geo::Coordinates;

use crate::geo::containment::{Containment, check_containment};
use crate::office::resolver::{OfficeResolver, ResolvedOffice};

/// Result of a check-in position check.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckInDecision {
    /// The office the position was compared against.
    pub office: ResolvedOffice,
    /// Radius containment result.
    #[serde(flatten)]
    pub containment: Containment,
}

impl CheckInDecision {
    /// Whether the check-in may proceed.
    pub fn allowed(&self) -> bool {
        self.containment.contained
    }

    /// Meters beyond the radius, zero when inside.
    pub fn meters_outside(&self) -> f64 {
        (self.containment.distance_meters - self.containment.radius_meters).max(0.0)
    }
}

/// Validates check-in positions against the resolved office.
#[derive(Debug, Clone)]
pub struct CheckInValidator {
    offices: OfficeResolver,
}

impl CheckInValidator {
    /// Creates a validator.
    pub fn new(offices: OfficeResolver) -> Self {
        Self { offices }
    }

    /// Checks `position` against the current office.
    ///
    /// Returns a validation error for unusable coordinates; the caller must
    /// then refuse to decide rather than treat it as outside.
    pub async fn validate(&self, position: Coordinates) -> AppResult<CheckInDecision> {
        position.ensure_valid()?;
        let office = self.offices.resolve().await;
        let containment = check_containment(position, &office.location)?;

        info!(
            contained = containment.contained,
            distance_m = containment.distance_meters,
            radius_m = containment.radius_meters,
            origin = ?office.origin,
            "Check-in position evaluated"
        );

        Ok(CheckInDecision {
            office,
            containment,
        })
    }
}
