//! Authenticated-user resolution.

use async_trait::async_trait;

use crate::result::AppResult;
use crate::types::id::UserId;

/// Resolves the user the current session belongs to.
#[async_trait]
pub trait UserResolver: Send + Sync + std::fmt::Debug + 'static {
    /// Returns the signed-in user, or `None` when nobody is signed in.
    async fn current_user(&self) -> AppResult<Option<UserId>>;
}
