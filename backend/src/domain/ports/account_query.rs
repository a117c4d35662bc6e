//! Driving port for reading the caller's own account.

use async_trait::async_trait;

use crate::domain::{AuthContext, Error, UserProfile};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountQuery: Send + Sync {
    /// Profile (including status) of the authenticated caller.
    async fn status(&self, context: &AuthContext) -> Result<UserProfile, Error>;
}
