//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every REST endpoint, the request and response bodies
//! and the bearer token security scheme. The document backs Swagger UI in
//! debug builds and is exported with `cargo run --bin openapi-dump`.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{AuthenticatedSession, PostAuthor, PostView, UserProfile};
use crate::inbound::http::images::ImageUploadResponse;
use crate::inbound::http::posts::{PostRequest, PostsPageResponse};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use crate::inbound::http::status::StatusRequest;
use crate::inbound::http::users::{LoginRequest, RegisterRequest};

/// Name of the bearer security scheme in the generated document.
pub const BEARER_SCHEME: &str = "BearerAuth";

/// Adds the bearer token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        let bearer = HttpBuilder::new()
            .scheme(HttpAuthScheme::Bearer)
            .bearer_format("JWT")
            .description(Some("Session token issued by POST /api/v1/login."))
            .build();
        components.add_security_scheme(BEARER_SCHEME, SecurityScheme::Http(bearer));
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Postboard API",
        description = "Register, sign in, and publish posts to a shared paginated feed."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerAuth" = [])),
    paths(
        crate::inbound::http::users::register,
        crate::inbound::http::users::login,
        crate::inbound::http::posts::list_posts,
        crate::inbound::http::posts::create_post,
        crate::inbound::http::posts::get_post,
        crate::inbound::http::posts::update_post,
        crate::inbound::http::posts::delete_post,
        crate::inbound::http::status::get_status,
        crate::inbound::http::status::update_status,
        crate::inbound::http::images::store_image,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        UserProfile,
        AuthenticatedSession,
        PostAuthor,
        PostView,
        PostsPageResponse,
        PostRequest,
        RegisterRequest,
        LoginRequest,
        StatusRequest,
        ImageUploadResponse,
    )),
    tags(
        (name = "users", description = "Registration, login and status"),
        (name = "posts", description = "Feed and post management"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Structural checks on the generated document.

    use rstest::{fixture, rstest};
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    use super::*;

    #[fixture]
    fn doc() -> utoipa::openapi::OpenApi {
        ApiDoc::openapi()
    }

    fn object_has_field(schema: &RefOr<Schema>, field: &str) -> bool {
        match schema {
            RefOr::T(Schema::Object(obj)) => obj.properties.contains_key(field),
            _ => false,
        }
    }

    #[rstest]
    #[case("/api/v1/users")]
    #[case("/api/v1/login")]
    #[case("/api/v1/posts")]
    #[case("/api/v1/posts/{postId}")]
    #[case("/api/v1/status")]
    #[case("/api/v1/post-image")]
    #[case("/health/ready")]
    #[case("/health/live")]
    fn every_route_is_documented(doc: utoipa::openapi::OpenApi, #[case] path: &str) {
        assert!(doc.paths.paths.contains_key(path), "missing path {path}");
    }

    #[rstest]
    fn bearer_scheme_is_registered(doc: utoipa::openapi::OpenApi) {
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key(BEARER_SCHEME));
    }

    #[rstest]
    #[case("UserProfile", "status")]
    #[case("PostView", "imageUrl")]
    #[case("PostsPageResponse", "totalPosts")]
    fn bodies_use_camel_case(
        doc: utoipa::openapi::OpenApi,
        #[case] schema: &str,
        #[case] field: &str,
    ) {
        let components = doc.components.expect("components");
        let schema = components.schemas.get(schema).expect("schema registered");
        assert!(object_has_field(schema, field), "missing field {field}");
    }

    #[rstest]
    fn profile_schema_never_exposes_password(doc: utoipa::openapi::OpenApi) {
        let components = doc.components.expect("components");
        let profile = components.schemas.get("UserProfile").expect("profile");
        assert!(!object_has_field(profile, "passwordHash"));
        assert!(!object_has_field(profile, "password"));
    }
}
