//! Check-in validation CLI command.

use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use attendance_core::config::AppConfig;
use attendance_core::error::AppError;
use attendance_core::types::geo::Coordinates;
use attendance_service::{CheckInValidator, OfficeResolver};

use crate::output::{self, OutputFormat};

use super::distance::format_point;

/// Arguments for the check-in command
#[derive(Debug, Args)]
pub struct CheckInArgs {
    /// Reported latitude
    #[arg(long, allow_hyphen_values = true)]
    pub lat: f64,
    /// Reported longitude
    #[arg(long, allow_hyphen_values = true)]
    pub lon: f64,
    /// Override the office latitude
    #[arg(long, allow_hyphen_values = true)]
    pub office_lat: Option<f64>,
    /// Override the office longitude
    #[arg(long, allow_hyphen_values = true)]
    pub office_lon: Option<f64>,
    /// Override the office radius in meters
    #[arg(long)]
    pub radius: Option<f64>,
}

/// Check-in display row
#[derive(Debug, Serialize, Tabled)]
struct CheckInRow {
    /// Office label
    office: String,
    /// Office position
    location: String,
    /// Lookup or fallback
    origin: String,
    /// Distance in meters
    distance_m: f64,
    /// Radius in meters
    radius_m: f64,
    /// Meters beyond the radius
    outside_m: f64,
    /// Whether check-in may proceed
    allowed: bool,
}

/// Execute the check-in command
pub async fn execute(
    args: &CheckInArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let mut office = config.office.clone();
    if let Some(lat) = args.office_lat {
        office.latitude = lat;
    }
    if let Some(lon) = args.office_lon {
        office.longitude = lon;
    }
    if let Some(radius) = args.radius {
        office.radius_meters = radius;
    }
    office.validate()?;

    let validator = CheckInValidator::new(OfficeResolver::fallback_only(&office));
    let decision = validator
        .validate(Coordinates::new(args.lat, args.lon))
        .await?;

    match format {
        OutputFormat::Json => output::print_json(&decision),
        OutputFormat::Table => {
            let location = &decision.office.location;
            output::print_record(
                &CheckInRow {
                    office: location.label.clone().unwrap_or_else(|| "-".to_string()),
                    location: format_point(location.coordinates),
                    origin: format!("{:?}", decision.office.origin).to_lowercase(),
                    distance_m: decision.containment.distance_meters,
                    radius_m: decision.containment.radius_meters,
                    outside_m: decision.meters_outside(),
                    allowed: decision.allowed(),
                },
                format,
            );
            if decision.allowed() {
                output::print_success("Within the office radius");
            } else {
                output::print_warning(&format!(
                    "Outside the office radius by {:.0} m",
                    decision.meters_outside()
                ));
            }
        }
    }
    Ok(())
}
