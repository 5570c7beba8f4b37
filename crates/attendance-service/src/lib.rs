//! # attendance-service
//!
//! Check-in and leave logic for Attendance Hub:
//!
//! - great-circle distance between coordinates
//! - office resolution with a configured fallback
//! - GPS-radius check-in validation
//! - leave balance tier classification shared by bar and badge rendering

pub mod checkin;
pub mod geo;
pub mod leave;
pub mod office;

pub use checkin::{CheckInDecision, CheckInValidator};
pub use geo::distance::distance_meters;
pub use leave::{BalanceTier, LeaveBalanceIndicator, TierClassifier};
pub use office::{OfficeResolver, ResolvedOffice};
