//! Change events delivered by the real-time feed.
//!
//! The backend streams row-level changes for the `notifications` table.
//! [`RowChangePayload`] is the raw wire shape; [`NotificationChange`] is the
//! typed event the client-side store consumes.

pub mod notification;

pub use notification::{NotificationChange, PreviousRow, RowChangePayload, RowEventType};
