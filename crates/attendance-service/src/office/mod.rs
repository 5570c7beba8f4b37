//! Office location resolution.

pub mod resolver;

pub use resolver::{OfficeOrigin, OfficeResolver, ResolvedOffice};
