//! Office location lookups.

use async_trait::async_trait;

use crate::result::AppResult;
use crate::types::geo::OfficeLocation;

/// Looks up the active office record.
#[async_trait]
pub trait OfficeLocationSource: Send + Sync + std::fmt::Debug + 'static {
    /// Returns the active office, or `None` when none is configured in the backend.
    async fn find_active_office(&self) -> AppResult<Option<OfficeLocation>>;
}
