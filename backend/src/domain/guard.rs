//! Ownership guard: who is calling, and may they touch this resource?
//!
//! Services call [`AuthContext::require_authenticated`] before any input
//! validation or lookup, then [`require_owner`] once the resource is loaded.

use crate::domain::{Error, Identity, UserId};

/// Message returned whenever an operation needs a caller identity.
pub const NOT_AUTHENTICATED: &str = "Not authenticated!";

/// Per-request authentication state derived from the bearer token.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthContext {
    identity: Option<Identity>,
}

impl AuthContext {
    /// Context for a caller presenting no valid token.
    pub fn anonymous() -> Self {
        Self { identity: None }
    }

    pub fn authenticated(identity: Identity) -> Self {
        Self {
            identity: Some(identity),
        }
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    /// The caller identity, or `Unauthorized` for anonymous callers.
    ///
    /// # Examples
    /// ```
    /// use postboard::domain::{AuthContext, ErrorCode};
    ///
    /// let err = AuthContext::anonymous().require_authenticated().unwrap_err();
    /// assert_eq!(err.code(), ErrorCode::Unauthorized);
    /// ```
    pub fn require_authenticated(&self) -> Result<&Identity, Error> {
        self.identity
            .as_ref()
            .ok_or_else(|| Error::unauthorized(NOT_AUTHENTICATED))
    }
}

impl From<Option<Identity>> for AuthContext {
    fn from(identity: Option<Identity>) -> Self {
        Self { identity }
    }
}

/// Allow only the resource owner; anyone else gets `Forbidden` with
/// `message`.
pub fn require_owner(identity: &Identity, owner: &UserId, message: &str) -> Result<(), Error> {
    if identity.user_id.as_ref() == owner.as_ref() {
        Ok(())
    } else {
        Err(Error::forbidden(message))
    }
}
