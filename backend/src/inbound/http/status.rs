//! Caller status HTTP handlers.
//!
//! ```text
//! GET /api/v1/status
//! PUT /api/v1/status {"status":"Busy writing"}
//! ```

use actix_web::{get, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::UserProfile;
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, require_field};

/// Body for `PUT /api/v1/status`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusRequest {
    #[schema(example = "Busy writing")]
    pub status: Option<String>,
}

/// Read the caller's profile, including their status line.
#[utoipa::path(
    get,
    path = "/api/v1/status",
    responses(
        (status = 200, description = "Caller profile", body = UserProfile),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Caller no longer exists", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "getStatus"
)]
#[get("/status")]
pub async fn get_status(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<UserProfile>> {
    let profile = state.accounts_query.status(session.auth()).await?;
    Ok(web::Json(profile))
}

/// Replace the caller's status line.
#[utoipa::path(
    put,
    path = "/api/v1/status",
    request_body = StatusRequest,
    responses(
        (status = 200, description = "Updated profile", body = UserProfile),
        (status = 400, description = "Missing field", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Caller no longer exists", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "updateStatus"
)]
#[put("/status")]
pub async fn update_status(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<StatusRequest>,
) -> ApiResult<web::Json<UserProfile>> {
    session.auth().require_authenticated()?;
    let status = require_field(payload.into_inner().status, FieldName::new("status"))?;
    let profile = state
        .accounts
        .update_status(session.auth(), status)
        .await?;
    Ok(web::Json(profile))
}

#[cfg(test)]
mod tests {
    use actix_web::http::{StatusCode, header};
    use actix_web::test as actix_test;
    use serde_json::{Value, json};

    use super::*;
    use crate::domain::{DisplayName, EmailAddress, PasswordHash, User, UserId};
    use crate::inbound::http::test_utils::{
        MockPorts, bearer_for, state_from, test_app, test_credentials,
    };

    fn profile_with(status: &str) -> UserProfile {
        let mut user = User::register(
            UserId::random(),
            EmailAddress::new("ada@example.com").expect("fixture email"),
            DisplayName::new("Ada"),
            PasswordHash::new("hash"),
        );
        user.set_status(status);
        user.profile()
    }

    async fn send(
        mocks: MockPorts,
        request: actix_test::TestRequest,
        signed_in: bool,
    ) -> (StatusCode, Value) {
        let credentials = test_credentials();
        let request = if signed_in {
            request.insert_header((
                header::AUTHORIZATION,
                bearer_for(&credentials, &UserId::random()),
            ))
        } else {
            request
        };
        let app = actix_test::init_service(test_app(state_from(mocks, credentials))).await;
        let response = actix_test::call_service(&app, request.to_request()).await;
        let status = response.status();
        let value: Value = actix_test::read_body_json(response).await;
        (status, value)
    }

    #[actix_web::test]
    async fn get_status_returns_profile() {
        let mut mocks = MockPorts::default();
        mocks
            .accounts_query
            .expect_status()
            .withf(|context| context.identity().is_some())
            .return_once(|_| Ok(profile_with("I am new!")));

        let (status, body) = send(
            mocks,
            actix_test::TestRequest::get().uri("/api/v1/status"),
            true,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "I am new!");
    }

    #[actix_web::test]
    async fn update_status_forwards_new_text() {
        let mut mocks = MockPorts::default();
        mocks
            .accounts
            .expect_update_status()
            .withf(|_, status| status == "Busy writing")
            .times(1)
            .return_once(|_, _| Ok(profile_with("Busy writing")));

        let (status, body) = send(
            mocks,
            actix_test::TestRequest::put()
                .uri("/api/v1/status")
                .set_json(json!({ "status": "Busy writing" })),
            true,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "Busy writing");
    }

    #[actix_web::test]
    async fn anonymous_update_is_401_even_without_body_field() {
        let mut mocks = MockPorts::default();
        mocks.accounts.expect_update_status().times(0);

        let (status, body) = send(
            mocks,
            actix_test::TestRequest::put()
                .uri("/api/v1/status")
                .set_json(json!({})),
            false,
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Not authenticated!");
    }

    #[actix_web::test]
    async fn missing_status_field_is_400() {
        let mut mocks = MockPorts::default();
        mocks.accounts.expect_update_status().times(0);

        let (status, body) = send(
            mocks,
            actix_test::TestRequest::put()
                .uri("/api/v1/status")
                .set_json(json!({})),
            true,
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["details"]["field"], "status");
    }
}
