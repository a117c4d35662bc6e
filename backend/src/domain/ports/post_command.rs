//! Driving port for post mutations.
//!
//! Post identifiers arrive as raw strings so that authentication and input
//! validation are judged before the identifier itself.

use async_trait::async_trait;

use crate::domain::{AuthContext, Error, PostDraft, PostView};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostCommand: Send + Sync {
    async fn create(&self, context: &AuthContext, draft: PostDraft) -> Result<PostView, Error>;

    /// Edit a post owned by the caller. `draft.image_url` set to `undefined`
    /// keeps the stored image.
    async fn update(
        &self,
        context: &AuthContext,
        post_id: &str,
        draft: PostDraft,
    ) -> Result<PostView, Error>;

    /// Delete a post owned by the caller, returning whether a record was
    /// removed.
    async fn delete(&self, context: &AuthContext, post_id: &str) -> Result<bool, Error>;
}
