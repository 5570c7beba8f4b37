//! # attendance-cache
//!
//! In-process caching for Attendance Hub.
//!
//! - [`TtlCache`]: a keyed cache with per-entry expiry driven by an injected
//!   [`Clock`](attendance_core::traits::Clock), so expiry and invalidation can
//!   be tested without sleeping.
//! - [`ProfileDirectory`]: profile lookups fronted by a `TtlCache`.

pub mod profile;
pub mod ttl;

pub use profile::ProfileDirectory;
pub use ttl::TtlCache;
