//! Geographic calculations.

pub mod containment;
pub mod distance;

pub use containment::{Containment, check_containment};
pub use distance::{EARTH_RADIUS_METERS, distance_meters};
