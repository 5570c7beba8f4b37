//! Convenience result type alias for Attendance Hub.

use crate::error::AppError;

/// A specialized `Result` type for Attendance Hub operations.
pub type AppResult<T> = Result<T, AppError>;
