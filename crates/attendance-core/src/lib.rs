//! # attendance-core
//!
//! Core crate for Attendance Hub. Contains the backend-facing traits,
//! configuration schemas, typed identifiers, domain records (notifications,
//! office locations, leave requests, profiles), real-time change events,
//! and the unified error system.
//!
//! This crate has **no** internal dependencies on other Attendance Hub crates.

pub mod config;
pub mod error;
pub mod events;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
