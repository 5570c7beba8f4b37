//! Office radius containment.

use serde::Serialize;

use attendance_core::result::AppResult;
use attendance_core::types::geo::{Coordinates, OfficeLocation};

use super::distance::distance_meters;

/// Outcome of comparing a position with an office radius.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Containment {
    /// Whether the position is inside the radius (edge included).
    pub contained: bool,
    /// Distance to the office, rounded to the nearest meter.
    pub distance_meters: f64,
    /// Radius that was applied.
    pub radius_meters: f64,
}

/// Checks whether `position` lies within the office radius.
///
/// Both coordinates are validated first; invalid input is a validation
/// error, never a containment decision.
pub fn check_containment(position: Coordinates, office: &OfficeLocation) -> AppResult<Containment> {
    position.ensure_valid()?;
    office.coordinates.ensure_valid()?;

    let radius = office.effective_radius();
    let distance = distance_meters(position, office.coordinates).round();

    Ok(Containment {
        contained: distance <= radius,
        distance_meters: distance,
        radius_meters: radius,
    })
}
