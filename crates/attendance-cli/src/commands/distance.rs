//! Distance CLI command.

use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use attendance_core::error::AppError;
use attendance_core::types::geo::Coordinates;
use attendance_service::distance_meters;

use crate::output::{self, OutputFormat};

/// Arguments for the distance command
#[derive(Debug, Args)]
pub struct DistanceArgs {
    /// Latitude of the first point
    #[arg(long, allow_hyphen_values = true)]
    pub from_lat: f64,
    /// Longitude of the first point
    #[arg(long, allow_hyphen_values = true)]
    pub from_lon: f64,
    /// Latitude of the second point
    #[arg(long, allow_hyphen_values = true)]
    pub to_lat: f64,
    /// Longitude of the second point
    #[arg(long, allow_hyphen_values = true)]
    pub to_lon: f64,
}

/// Distance display row
#[derive(Debug, Serialize, Tabled)]
struct DistanceRow {
    /// First point
    from: String,
    /// Second point
    to: String,
    /// Distance in meters
    meters: String,
}

/// Execute the distance command
pub fn execute(args: &DistanceArgs, format: OutputFormat) -> Result<(), AppError> {
    let from = Coordinates::new(args.from_lat, args.from_lon);
    let to = Coordinates::new(args.to_lat, args.to_lon);
    from.ensure_valid()?;
    to.ensure_valid()?;

    let meters = distance_meters(from, to);
    let row = DistanceRow {
        from: format_point(from),
        to: format_point(to),
        meters: format!("{meters:.1}"),
    };
    output::print_record(&row, format);
    Ok(())
}

pub(crate) fn format_point(point: Coordinates) -> String {
    format!("{:.6}, {:.6}", point.latitude, point.longitude)
}
