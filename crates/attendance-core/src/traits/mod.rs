//! Boundaries to the managed backend, defined here and implemented by
//! adapters (or by test fakes).

pub mod auth;
pub mod clock;
pub mod leave;
pub mod notification;
pub mod office;
pub mod profile;
pub mod realtime;

pub use auth::UserResolver;
pub use clock::{Clock, ManualClock, SystemClock};
pub use leave::LeaveRequestSource;
pub use notification::NotificationApi;
pub use office::OfficeLocationSource;
pub use profile::ProfileSource;
pub use realtime::{ChangeFeed, ChangeStream};
