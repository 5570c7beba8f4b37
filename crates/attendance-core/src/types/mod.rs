//! Shared domain types.

pub mod geo;
pub mod id;
pub mod leave;
pub mod notification;
pub mod profile;

pub use geo::{Coordinates, OfficeLocation};
pub use id::{LeaveRequestId, NotificationId, UserId};
pub use leave::{LeaveRequestDetail, LeaveStatus};
pub use notification::{Notification, NotificationCategory, RelatedEntity};
pub use profile::{EmployeeRole, UserProfile};
