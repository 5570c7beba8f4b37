//! Profile lookups.

use async_trait::async_trait;

use crate::result::AppResult;
use crate::types::id::UserId;
use crate::types::profile::UserProfile;

/// Loads employee profiles from the backend.
#[async_trait]
pub trait ProfileSource: Send + Sync + std::fmt::Debug + 'static {
    /// Returns the profile for `user_id`, or `None` if the row does not exist.
    async fn fetch_profile(&self, user_id: UserId) -> AppResult<Option<UserProfile>>;
}
