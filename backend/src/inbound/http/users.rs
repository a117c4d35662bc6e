//! Account HTTP handlers.
//!
//! ```text
//! POST /api/v1/users {"email":"ada@example.com","name":"Ada","password":"secret"}
//! POST /api/v1/login {"email":"ada@example.com","password":"secret"}
//! ```

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{AuthenticatedSession, LoginCredentials, Registration, UserProfile};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, require_field};

const EMAIL: FieldName = FieldName::new("email");
const NAME: FieldName = FieldName::new("name");
const PASSWORD: FieldName = FieldName::new("password");

/// Registration request body for `POST /api/v1/users`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[schema(example = "ada@example.com")]
    pub email: Option<String>,
    #[schema(example = "Ada Lovelace")]
    pub name: Option<String>,
    #[schema(example = "secret")]
    pub password: Option<String>,
}

/// Login request body for `POST /api/v1/login`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[schema(example = "ada@example.com")]
    pub email: Option<String>,
    #[schema(example = "secret")]
    pub password: Option<String>,
}

/// Register a new account.
#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User created", body = UserProfile),
        (status = 400, description = "Missing field", body = ErrorSchema),
        (status = 409, description = "Email already registered", body = ErrorSchema),
        (status = 422, description = "Validation failed", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "register",
    security([])
)]
#[post("/users")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let RegisterRequest {
        email,
        name,
        password,
    } = payload.into_inner();
    let registration = Registration::new(
        require_field(email, EMAIL)?,
        require_field(name, NAME)?,
        &require_field(password, PASSWORD)?,
    );
    let profile = state.accounts.register(registration).await?;
    Ok(HttpResponse::Created().json(profile))
}

/// Exchange credentials for a bearer token.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = AuthenticatedSession),
        (status = 400, description = "Missing field", body = ErrorSchema),
        (status = 401, description = "Invalid credentials", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<AuthenticatedSession>> {
    let LoginRequest { email, password } = payload.into_inner();
    let credentials = LoginCredentials::new(
        require_field(email, EMAIL)?,
        &require_field(password, PASSWORD)?,
    );
    let session = state.accounts.login(credentials).await?;
    Ok(web::Json(session))
}
