//! Driven port for signing and checking session tokens.
//!
//! Codecs only vouch for the signature and the claim shape. Expiry is judged
//! by [`CredentialService`](crate::domain::CredentialService) against its
//! injected clock.

use serde::{Deserialize, Serialize};

use super::define_port_error;

define_port_error! {
    /// Errors raised when a token cannot be produced.
    pub enum TokenCodecError {
        /// The signing primitive rejected the claims or key.
        Signing { message: String } => "token signing failed: {message}",
    }
}

/// Claim set carried inside a session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionClaims {
    pub email: String,
    pub user_id: String,
    /// Expiry as seconds since the Unix epoch.
    pub exp: i64,
    /// Issue time as seconds since the Unix epoch.
    pub iat: i64,
}

#[cfg_attr(test, mockall::automock)]
pub trait TokenCodec: Send + Sync {
    /// Sign `claims` into a compact token string.
    fn sign(&self, claims: &SessionClaims) -> Result<String, TokenCodecError>;

    /// Check the signature and decode the claims; `None` on any failure.
    fn decode(&self, token: &str) -> Option<SessionClaims>;
}
