//! Post operations: create, update, delete, list and get.
//!
//! Every operation checks authentication first, then input, then loads the
//! resource, then checks ownership. Create and delete write the post and the
//! owner's post set as two separate calls with no transaction around them; a
//! failure of the second write is returned to the caller and leaves the first
//! in place.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use pagination::{Page, PageNumber, PageRequest, PageSize};
use serde_json::json;
use tracing::{info, warn};

use crate::domain::ports::{
    ImageStore, PostCommand, PostPersistenceError, PostQuery, PostRepository,
    UserPersistenceError, UserRepository,
};
use crate::domain::{
    AuthContext, Error, INVALID_INPUT, ImageRef, ImageUpdate, Post, PostAuthor, PostDraft, PostId,
    PostView, require_owner,
};

pub const INVALID_USER: &str = "Invalid User.";
pub const POST_NOT_FOUND: &str = "Could not find post!";
pub const DELETE_NOT_FOUND: &str = "Could not find Post to delete.";
pub const EDIT_FORBIDDEN: &str = "Cannot edit post of another user!";
pub const DELETE_FORBIDDEN: &str = "Cannot delete post of another user!";
pub const DELETE_INCOMPLETE: &str = "Could not find and remove Post.";

fn map_post_error(error: PostPersistenceError) -> Error {
    match error {
        PostPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("post repository unavailable: {message}"))
        }
        PostPersistenceError::Query { message } => {
            Error::internal_cause("post repository error", message)
        }
    }
}

fn map_user_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        other => Error::internal_cause("user repository error", other),
    }
}

fn parse_post_id(raw: &str) -> Result<PostId, Error> {
    PostId::new(raw).map_err(|err| {
        Error::invalid_request(format!("Invalid post id: {err}"))
            .with_details(json!({ "field": "postId", "value": raw }))
    })
}

fn validate_draft(draft: &PostDraft) -> Result<(), Error> {
    let errors = draft.validate();
    if errors.is_empty() {
        Ok(())
    } else {
        Err(Error::validation_failed(
            INVALID_INPUT,
            errors.iter().map(ToString::to_string),
        ))
    }
}

/// Post service implementing [`PostCommand`] and [`PostQuery`].
#[derive(Clone)]
pub struct PostService<P, U, I> {
    posts: Arc<P>,
    users: Arc<U>,
    images: Arc<I>,
    clock: Arc<dyn Clock>,
    page_size: PageSize,
}

impl<P, U, I> PostService<P, U, I> {
    pub fn new(posts: Arc<P>, users: Arc<U>, images: Arc<I>, clock: Arc<dyn Clock>) -> Self {
        Self {
            posts,
            users,
            images,
            clock,
            page_size: PageSize::default(),
        }
    }

    /// Override the feed page size.
    #[must_use]
    pub fn with_page_size(mut self, page_size: PageSize) -> Self {
        self.page_size = page_size;
        self
    }
}

impl<P, U, I> PostService<P, U, I>
where
    I: ImageStore,
{
    /// Best-effort image release; failures are logged only.
    async fn release_image(&self, image: &ImageRef) {
        if image.as_ref().is_empty() {
            return;
        }
        if let Err(err) = self.images.clear(image).await {
            warn!(error = %err, image = image.as_ref(), "failed to release post image");
        }
    }
}

#[async_trait]
impl<P, U, I> PostCommand for PostService<P, U, I>
where
    P: PostRepository,
    U: UserRepository,
    I: ImageStore,
{
    async fn create(&self, context: &AuthContext, draft: PostDraft) -> Result<PostView, Error> {
        let identity = context.require_authenticated()?;
        validate_draft(&draft)?;

        let mut owner = self
            .users
            .find_by_id(&identity.user_id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::unauthorized(INVALID_USER))?;

        let post = Post::create(PostId::random(), draft, owner.id().clone(), self.clock.utc());
        self.posts.insert(&post).await.map_err(map_post_error)?;

        owner.add_post(post.id().clone());
        self.users.save(&owner).await.map_err(map_user_error)?;

        info!(post_id = %post.id(), user_id = %owner.id(), "created post");
        let author = PostAuthor {
            id: owner.id().clone(),
            name: owner.name().clone(),
        };
        Ok(PostView::new(post, author))
    }

    async fn update(
        &self,
        context: &AuthContext,
        post_id: &str,
        draft: PostDraft,
    ) -> Result<PostView, Error> {
        let identity = context.require_authenticated()?;
        validate_draft(&draft)?;
        let post_id = parse_post_id(post_id)?;

        let (mut post, author) = self
            .posts
            .find_with_creator(&post_id)
            .await
            .map_err(map_post_error)?
            .ok_or_else(|| Error::not_found(POST_NOT_FOUND))?
            .into_parts();
        require_owner(identity, &author.id, EDIT_FORBIDDEN)?;

        let PostDraft {
            title,
            content,
            image_url,
        } = draft;
        post.apply_edit(
            title,
            content,
            ImageUpdate::from_supplied(image_url),
            self.clock.utc(),
        );
        self.posts.save(&post).await.map_err(map_post_error)?;

        info!(post_id = %post.id(), "updated post");
        Ok(PostView::new(post, author))
    }

    async fn delete(&self, context: &AuthContext, post_id: &str) -> Result<bool, Error> {
        let identity = context.require_authenticated()?;
        let post_id = parse_post_id(post_id)?;

        let post = self
            .posts
            .find(&post_id)
            .await
            .map_err(map_post_error)?
            .ok_or_else(|| Error::not_found(DELETE_NOT_FOUND))?;
        require_owner(identity, post.creator(), DELETE_FORBIDDEN)?;

        let removed = self.posts.delete(&post_id).await.map_err(map_post_error)?;
        self.release_image(post.image_url()).await;

        let mut owner = self
            .users
            .find_by_id(&identity.user_id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::internal(DELETE_INCOMPLETE))?;
        owner.remove_post(&post_id);
        self.users.save(&owner).await.map_err(map_user_error)?;

        info!(post_id = %post_id, removed, "deleted post");
        Ok(removed)
    }
}

#[async_trait]
impl<P, U, I> PostQuery for PostService<P, U, I>
where
    P: PostRepository,
    U: UserRepository,
    I: ImageStore,
{
    async fn list(
        &self,
        context: &AuthContext,
        page: PageNumber,
    ) -> Result<Page<PostView>, Error> {
        context.require_authenticated()?;
        let request = PageRequest::new(page, self.page_size);

        let total = self.posts.count().await.map_err(map_post_error)?;
        let posts = self
            .posts
            .list_newest_first(request)
            .await
            .map_err(map_post_error)?;
        Ok(Page::new(posts, total))
    }

    async fn get(&self, context: &AuthContext, post_id: &str) -> Result<PostView, Error> {
        context.require_authenticated()?;
        let post_id = parse_post_id(post_id)?;

        self.posts
            .find_with_creator(&post_id)
            .await
            .map_err(map_post_error)?
            .ok_or_else(|| Error::not_found(POST_NOT_FOUND))
    }
}

#[cfg(test)]
#[path = "post_service_tests.rs"]
mod tests;
