//! Bearer session extraction.
//!
//! Handlers take a [`SessionContext`] argument to learn who is calling. The
//! extractor never rejects a request: a missing, malformed, forged or expired
//! token simply yields an anonymous context, and each operation decides
//! whether it requires authentication.

use actix_web::http::header::{self, HeaderMap};
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::{Ready, ready};
use tracing::{debug, warn};

use crate::domain::AuthContext;
use crate::inbound::http::state::HttpState;

const BEARER_SCHEME: &str = "bearer";

/// Caller context resolved from the `Authorization` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext(AuthContext);

impl SessionContext {
    /// Borrow the resolved authentication context.
    pub fn auth(&self) -> &AuthContext {
        &self.0
    }

    /// Consume the wrapper.
    pub fn into_inner(self) -> AuthContext {
        self.0
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case(BEARER_SCHEME) {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

fn resolve(req: &HttpRequest) -> AuthContext {
    let Some(token) = bearer_token(req.headers()) else {
        return AuthContext::anonymous();
    };
    let Some(state) = req.app_data::<web::Data<HttpState>>() else {
        warn!("bearer token presented but no HTTP state is registered");
        return AuthContext::anonymous();
    };
    let identity = state.credentials.verify(token);
    if identity.is_none() {
        debug!("bearer token rejected");
    }
    AuthContext::from(identity)
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Ok(Self(resolve(req))))
    }
}
