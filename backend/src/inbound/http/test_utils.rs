//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};
use chrono::{TimeZone, Utc};

use crate::domain::ports::{
    MockAccountCommand, MockAccountQuery, MockImageCommand, MockPostCommand, MockPostQuery,
};
use crate::domain::{CredentialService, EmailAddress, UserId};
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::outbound::security::JwtTokenCodec;
use crate::test_support::MutableClock;

/// Mocks for every driving port; unset expectations fail the test if hit.
#[derive(Default)]
pub struct MockPorts {
    pub accounts: MockAccountCommand,
    pub accounts_query: MockAccountQuery,
    pub posts: MockPostCommand,
    pub posts_query: MockPostQuery,
    pub images: MockImageCommand,
}

/// Credential service on a frozen clock with a fixed signing key.
pub fn test_credentials() -> Arc<CredentialService> {
    let now = Utc
        .with_ymd_and_hms(2026, 3, 1, 12, 0, 0)
        .single()
        .expect("valid timestamp");
    Arc::new(CredentialService::new(
        Arc::new(JwtTokenCodec::new(b"http-tests")),
        Arc::new(MutableClock::new(now)),
    ))
}

/// Issue a token for `user_id` that `credentials` will accept.
pub fn bearer_for(credentials: &CredentialService, user_id: &UserId) -> String {
    let email = EmailAddress::new("caller@example.com").expect("fixture email");
    let token = credentials.issue(&email, user_id).expect("token issues");
    format!("Bearer {}", token.as_str())
}

/// Build HTTP state from mock ports.
pub fn state_from(mocks: MockPorts, credentials: Arc<CredentialService>) -> HttpState {
    HttpState::new(
        HttpStatePorts {
            accounts: Arc::new(mocks.accounts),
            accounts_query: Arc::new(mocks.accounts_query),
            posts: Arc::new(mocks.posts),
            posts_query: Arc::new(mocks.posts_query),
            images: Arc::new(mocks.images),
        },
        credentials,
    )
}

/// App with every `/api/v1` handler mounted over `state`.
pub fn test_app(
    state: HttpState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .service(super::api_scope())
}
