//! Shared harness for the HTTP integration suites.
//!
//! Builds the real services over in-memory repositories, a temporary image
//! directory and a movable clock, then serves them through the production
//! `api_scope` behind the `Trace` middleware.

use std::sync::Arc;

use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::{StatusCode, header};
use actix_web::{App, test, web};
use chrono::{TimeZone, Utc};
use mockable::Clock;
use postboard::Trace;
use postboard::domain::ports::UserRepository;
use postboard::domain::{
    AccountService, CredentialService, ImageService, PostService, TRACE_ID_HEADER,
};
use postboard::inbound::http::api_scope;
use postboard::inbound::http::state::{HttpState, HttpStatePorts};
use postboard::outbound::memory::MemoryStore;
use postboard::outbound::security::{BcryptPasswordHasher, JwtTokenCodec};
use postboard::outbound::storage::FsImageStore;
use postboard::test_support::MutableClock;
use serde_json::{Value, json};
use tempfile::TempDir;

/// Parsed response from the app under test.
#[derive(Debug)]
pub struct Reply {
    pub status: StatusCode,
    pub body: Value,
    pub trace_id: Option<String>,
}

/// Services and backing stores for one test.
pub struct Board {
    pub store: MemoryStore,
    pub clock: Arc<MutableClock>,
    pub credentials: Arc<CredentialService>,
    pub images_dir: TempDir,
    state: HttpState,
}

impl Board {
    /// Board with the plain in-memory user repository.
    pub fn new() -> Self {
        Self::with_users(|store| Arc::new(store.users()))
    }

    /// Board whose services use the user repository built by `make_users`.
    pub fn with_users<U>(make_users: impl FnOnce(&MemoryStore) -> Arc<U>) -> Self
    where
        U: UserRepository + 'static,
    {
        let store = MemoryStore::new();
        let clock = Arc::new(MutableClock::new(
            Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0)
                .single()
                .expect("valid timestamp"),
        ));
        let dyn_clock: Arc<dyn Clock> = clock.clone();
        let credentials = Arc::new(CredentialService::new(
            Arc::new(JwtTokenCodec::new(b"integration-secret")),
            Arc::clone(&dyn_clock),
        ));
        let images_dir = tempfile::tempdir().expect("image dir");
        let images =
            Arc::new(FsImageStore::open(images_dir.path(), "images").expect("image store"));
        let users = make_users(&store);

        let accounts = Arc::new(AccountService::new(
            Arc::clone(&users),
            Arc::new(BcryptPasswordHasher::new(4)),
            Arc::clone(&credentials),
        ));
        let posts = Arc::new(PostService::new(
            Arc::new(store.posts()),
            users,
            Arc::clone(&images),
            Arc::clone(&dyn_clock),
        ));
        let ports = HttpStatePorts {
            accounts: accounts.clone(),
            accounts_query: accounts,
            posts: posts.clone(),
            posts_query: posts,
            images: Arc::new(ImageService::new(images, dyn_clock)),
        };
        let state = HttpState::new(ports, Arc::clone(&credentials));

        Self {
            store,
            clock,
            credentials,
            images_dir,
            state,
        }
    }

    pub async fn app(
        &self,
    ) -> impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>
    {
        test::init_service(
            App::new()
                .app_data(web::Data::new(self.state.clone()))
                .wrap(Trace)
                .service(api_scope()),
        )
        .await
    }
}

/// Send `request` and decode the JSON body (`Null` when empty).
pub async fn send(
    app: &impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
    request: test::TestRequest,
) -> Reply {
    let response = test::call_service(app, request.to_request()).await;
    let status = response.status();
    let trace_id = response
        .headers()
        .get(TRACE_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);
    let bytes = test::read_body(response).await;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("JSON body")
    };
    Reply {
        status,
        body,
        trace_id,
    }
}

/// Attach a bearer token to a request.
pub fn authorised(request: test::TestRequest, token: &str) -> test::TestRequest {
    request.insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
}

/// Register an account and sign in, returning `(token, user id)`.
pub async fn sign_up(
    app: &impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
    email: &str,
    name: &str,
) -> (String, String) {
    let registered = send(
        app,
        test::TestRequest::post().uri("/api/v1/users").set_json(json!({
            "email": email,
            "name": name,
            "password": "s3cret-pass",
        })),
    )
    .await;
    assert_eq!(registered.status, StatusCode::CREATED, "{:?}", registered.body);

    let login = send(
        app,
        test::TestRequest::post()
            .uri("/api/v1/login")
            .set_json(json!({ "email": email, "password": "s3cret-pass" })),
    )
    .await;
    assert_eq!(login.status, StatusCode::OK, "{:?}", login.body);

    let token = login.body["token"].as_str().expect("token").to_owned();
    let user_id = login.body["userId"].as_str().expect("userId").to_owned();
    (token, user_id)
}

/// Create a post as the bearer of `token`, returning its JSON view.
pub async fn create_post(
    app: &impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
    token: &str,
    title: &str,
    image_url: Option<&str>,
) -> Value {
    let mut body = json!({ "title": title, "content": "Some content here" });
    if let Some(image_url) = image_url {
        body["imageUrl"] = json!(image_url);
    }
    let reply = send(
        app,
        authorised(test::TestRequest::post().uri("/api/v1/posts"), token).set_json(body),
    )
    .await;
    assert_eq!(reply.status, StatusCode::CREATED, "{:?}", reply.body);
    reply.body
}
