//! Driving port for account mutations: sign-up, login and status edits.
//!
//! Inbound adapters call this port without knowing how users are stored or
//! how passwords and tokens are produced.

use async_trait::async_trait;

use crate::domain::{
    AuthContext, AuthenticatedSession, Error, LoginCredentials, Registration, UserProfile,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountCommand: Send + Sync {
    /// Create a principal from a sign-up request.
    async fn register(&self, registration: Registration) -> Result<UserProfile, Error>;

    /// Exchange credentials for a session token.
    async fn login(&self, credentials: LoginCredentials) -> Result<AuthenticatedSession, Error>;

    /// Replace the caller's own status text.
    async fn update_status(
        &self,
        context: &AuthContext,
        status: String,
    ) -> Result<UserProfile, Error>;
}
