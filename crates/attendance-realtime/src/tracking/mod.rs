//! Read tracking for an open notification list.

pub mod processing;
pub mod session;

pub use processing::{ProcessingGuard, ProcessingTicket};
pub use session::{ReadTrackingSession, TrackingState};
