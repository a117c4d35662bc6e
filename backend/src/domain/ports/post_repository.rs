//! Driven port for post persistence and the feed read model.
use async_trait::async_trait;
use pagination::PageRequest;

use crate::domain::{Post, PostId, PostView};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by post repository adapters.
    pub enum PostPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "post repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "post repository query failed: {message}",
    }
}

/// Storage for posts.
///
/// Reads that return [`PostView`] join each post with its creator inside the
/// adapter; posts whose creator row is missing are skipped by those reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn insert(&self, post: &Post) -> Result<(), PostPersistenceError>;

    /// Overwrite the mutable fields of an existing post.
    async fn save(&self, post: &Post) -> Result<(), PostPersistenceError>;

    /// Load a post with its raw creator id.
    async fn find(&self, id: &PostId) -> Result<Option<Post>, PostPersistenceError>;

    /// Load a post joined with its creator summary.
    async fn find_with_creator(
        &self,
        id: &PostId,
    ) -> Result<Option<PostView>, PostPersistenceError>;

    /// One window of the feed, newest first by creation time.
    async fn list_newest_first(
        &self,
        request: PageRequest,
    ) -> Result<Vec<PostView>, PostPersistenceError>;

    /// Number of posts in the whole collection.
    async fn count(&self) -> Result<u64, PostPersistenceError>;

    /// Remove a post, returning whether exactly one record was deleted.
    async fn delete(&self, id: &PostId) -> Result<bool, PostPersistenceError>;
}
