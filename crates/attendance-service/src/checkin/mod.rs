//! GPS check-in validation.

pub mod validator;

pub use validator::{CheckInDecision, CheckInValidator};
