//! Post HTTP handlers.
//!
//! ```text
//! GET    /api/v1/posts?page=2
//! POST   /api/v1/posts
//! GET    /api/v1/posts/{postId}
//! PUT    /api/v1/posts/{postId}
//! DELETE /api/v1/posts/{postId}
//! ```
//!
//! Every route requires `Authorization: Bearer <token>`.

use actix_web::{HttpResponse, delete, get, post, put, web};
use pagination::{Page, PageNumber};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{KEEP_IMAGE_SENTINEL, PostDraft, PostView};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Title, body and image reference supplied when writing a post.
///
/// Missing text fields are treated as empty and fail domain validation. A
/// missing `imageUrl` on update keeps the stored image.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PostRequest {
    #[schema(example = "First post")]
    pub title: Option<String>,
    #[schema(example = "Hello, world")]
    pub content: Option<String>,
    #[schema(example = "images/1767225600000-cat.png")]
    pub image_url: Option<String>,
}

impl PostRequest {
    fn into_draft(self, missing_image: &str) -> PostDraft {
        PostDraft {
            title: self.title.unwrap_or_default(),
            content: self.content.unwrap_or_default(),
            image_url: self.image_url.unwrap_or_else(|| missing_image.to_owned()),
        }
    }
}

/// Query string for the feed.
#[derive(Debug, Deserialize, IntoParams)]
pub struct ListPostsQuery {
    /// 1-indexed page number; absent or `0` means the first page.
    pub page: Option<u32>,
}

/// One feed page.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PostsPageResponse {
    pub posts: Vec<PostView>,
    /// Number of posts across all pages.
    pub total_posts: u64,
}

impl From<Page<PostView>> for PostsPageResponse {
    fn from(page: Page<PostView>) -> Self {
        let (posts, total_posts) = page.into_parts();
        Self { posts, total_posts }
    }
}

/// List posts, newest first, two per page.
#[utoipa::path(
    get,
    path = "/api/v1/posts",
    params(ListPostsQuery),
    responses(
        (status = 200, description = "Feed page", body = PostsPageResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["posts"],
    operation_id = "listPosts"
)]
#[get("/posts")]
pub async fn list_posts(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<ListPostsQuery>,
) -> ApiResult<web::Json<PostsPageResponse>> {
    let page = PageNumber::from_requested(query.into_inner().page);
    let page = state.posts_query.list(session.auth(), page).await?;
    Ok(web::Json(PostsPageResponse::from(page)))
}

/// Create a post owned by the caller.
#[utoipa::path(
    post,
    path = "/api/v1/posts",
    request_body = PostRequest,
    responses(
        (status = 201, description = "Post created", body = PostView),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 422, description = "Validation failed", body = ErrorSchema)
    ),
    tags = ["posts"],
    operation_id = "createPost"
)]
#[post("/posts")]
pub async fn create_post(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<PostRequest>,
) -> ApiResult<HttpResponse> {
    let draft = payload.into_inner().into_draft("");
    let view = state.posts.create(session.auth(), draft).await?;
    Ok(HttpResponse::Created().json(view))
}

/// Fetch one post with its creator.
#[utoipa::path(
    get,
    path = "/api/v1/posts/{postId}",
    params(("postId" = String, Path, description = "Post identifier")),
    responses(
        (status = 200, description = "Post", body = PostView),
        (status = 400, description = "Malformed identifier", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["posts"],
    operation_id = "getPost"
)]
#[get("/posts/{post_id}")]
pub async fn get_post(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<PostView>> {
    let view = state.posts_query.get(session.auth(), &path).await?;
    Ok(web::Json(view))
}

/// Edit a post owned by the caller.
///
/// An `imageUrl` of `undefined` keeps the current image.
#[utoipa::path(
    put,
    path = "/api/v1/posts/{postId}",
    params(("postId" = String, Path, description = "Post identifier")),
    request_body = PostRequest,
    responses(
        (status = 200, description = "Updated post", body = PostView),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Not the owner", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 422, description = "Validation failed", body = ErrorSchema)
    ),
    tags = ["posts"],
    operation_id = "updatePost"
)]
#[put("/posts/{post_id}")]
pub async fn update_post(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<PostRequest>,
) -> ApiResult<web::Json<PostView>> {
    let draft = payload.into_inner().into_draft(KEEP_IMAGE_SENTINEL);
    let view = state.posts.update(session.auth(), &path, draft).await?;
    Ok(web::Json(view))
}

/// Delete a post owned by the caller and release its image.
#[utoipa::path(
    delete,
    path = "/api/v1/posts/{postId}",
    params(("postId" = String, Path, description = "Post identifier")),
    responses(
        (status = 200, description = "Whether a record was removed", body = bool),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Not the owner", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["posts"],
    operation_id = "deletePost"
)]
#[delete("/posts/{post_id}")]
pub async fn delete_post(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<bool>> {
    let removed = state.posts.delete(session.auth(), &path).await?;
    Ok(web::Json(removed))
}
