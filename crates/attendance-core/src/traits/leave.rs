//! Leave request lookups.

use async_trait::async_trait;

use crate::result::AppResult;
use crate::types::id::LeaveRequestId;
use crate::types::leave::LeaveRequestDetail;

/// Fetches leave request rows referenced by notifications.
#[async_trait]
pub trait LeaveRequestSource: Send + Sync + std::fmt::Debug + 'static {
    /// Returns the detail of one leave request.
    async fn fetch_leave_request(&self, id: LeaveRequestId) -> AppResult<LeaveRequestDetail>;
}
