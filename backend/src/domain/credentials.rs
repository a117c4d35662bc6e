//! Issue and verify signed session tokens.
//!
//! Verification never fails the request pipeline: anything short of a valid,
//! unexpired token collapses to "no identity" and handlers decide whether
//! that matters.

use std::sync::Arc;

use chrono::TimeDelta;
use mockable::Clock;
use tracing::{debug, error};

use crate::domain::ports::{SessionClaims, TokenCodec};
use crate::domain::{EmailAddress, Error, Identity, SessionToken, UserId};

/// Default session lifetime in seconds.
pub const DEFAULT_TOKEN_TTL_SECONDS: i64 = 60 * 60;

/// Token issuer and verifier bound to a codec and a clock.
///
/// # Examples
/// ```
/// use std::sync::Arc;
///
/// use mockable::DefaultClock;
/// use postboard::domain::{CredentialService, EmailAddress, UserId};
/// use postboard::outbound::security::JwtTokenCodec;
///
/// let service = CredentialService::new(
///     Arc::new(JwtTokenCodec::new(b"doc-secret")),
///     Arc::new(DefaultClock),
/// );
/// let user_id = UserId::random();
/// let email = EmailAddress::new("ada@example.com").unwrap();
/// let token = service.issue(&email, &user_id).unwrap();
/// assert_eq!(service.verify(token.as_str()).unwrap().user_id, user_id);
/// ```
#[derive(Clone)]
pub struct CredentialService {
    codec: Arc<dyn TokenCodec>,
    clock: Arc<dyn Clock>,
    ttl: TimeDelta,
}

impl CredentialService {
    /// Build a service issuing tokens valid for one hour.
    pub fn new(codec: Arc<dyn TokenCodec>, clock: Arc<dyn Clock>) -> Self {
        Self {
            codec,
            clock,
            ttl: TimeDelta::seconds(DEFAULT_TOKEN_TTL_SECONDS),
        }
    }

    /// Override the token lifetime.
    #[must_use]
    pub fn with_ttl(mut self, ttl: TimeDelta) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn ttl(&self) -> TimeDelta {
        self.ttl
    }

    /// Sign a token for `user_id` expiring `ttl` from now.
    pub fn issue(&self, email: &EmailAddress, user_id: &UserId) -> Result<SessionToken, Error> {
        let now = self.clock.utc();
        let claims = SessionClaims {
            email: email.as_ref().to_owned(),
            user_id: user_id.as_ref().to_owned(),
            exp: (now + self.ttl).timestamp(),
            iat: now.timestamp(),
        };
        self.codec
            .sign(&claims)
            .map(SessionToken::new)
            .map_err(|err| {
                error!(error = %err, user_id = %user_id, "failed to sign session token");
                Error::internal("failed to issue session token")
            })
    }

    /// Recover the caller identity from a bearer token.
    ///
    /// Returns `None` for bad signatures, malformed claims, non-UUID subjects
    /// and tokens whose `exp` is at or before the current instant.
    pub fn verify(&self, token: &str) -> Option<Identity> {
        let claims = self.codec.decode(token)?;
        if claims.exp <= self.clock.utc().timestamp() {
            debug!(exp = claims.exp, "rejected expired session token");
            return None;
        }
        match UserId::new(&claims.user_id) {
            Ok(user_id) => Some(Identity {
                user_id,
                email: claims.email,
            }),
            Err(err) => {
                debug!(error = %err, "rejected session token with malformed subject");
                None
            }
        }
    }
}
