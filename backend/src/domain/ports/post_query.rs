//! Driving port for feed and single-post reads.

use async_trait::async_trait;
use pagination::{Page, PageNumber};

use crate::domain::{AuthContext, Error, PostView};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostQuery: Send + Sync {
    /// One feed page, newest first, with the total post count.
    async fn list(
        &self,
        context: &AuthContext,
        page: PageNumber,
    ) -> Result<Page<PostView>, Error>;

    async fn get(&self, context: &AuthContext, post_id: &str) -> Result<PostView, Error>;
}
