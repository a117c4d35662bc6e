use async_trait::async_trait;
use pagination::PageRequest;

use crate::domain::ports::{PostPersistenceError, PostRepository};
use crate::domain::{Post, PostAuthor, PostId, PostView};

use super::{MemoryStore, Tables};

/// In-memory [`PostRepository`].
///
/// Feed order matches the database adapter: `created_at` descending, ties
/// broken by id descending.
#[derive(Debug, Clone)]
pub struct MemoryPostRepository {
    store: MemoryStore,
}

impl MemoryPostRepository {
    pub(super) fn new(store: MemoryStore) -> Self {
        Self { store }
    }
}

fn join_creator(tables: &Tables, post: &Post) -> Option<PostView> {
    let creator = tables.users.get(post.creator().as_uuid())?;
    let author = PostAuthor {
        id: creator.id().clone(),
        name: creator.name().clone(),
    };
    Some(PostView::new(post.clone(), author))
}

#[async_trait]
impl PostRepository for MemoryPostRepository {
    async fn insert(&self, post: &Post) -> Result<(), PostPersistenceError> {
        self.store
            .lock()
            .posts
            .insert(*post.id().as_uuid(), post.clone());
        Ok(())
    }

    async fn save(&self, post: &Post) -> Result<(), PostPersistenceError> {
        let mut tables = self.store.lock();
        match tables.posts.get_mut(post.id().as_uuid()) {
            Some(stored) => {
                *stored = post.clone();
                Ok(())
            }
            None => Err(PostPersistenceError::query("post not found for update")),
        }
    }

    async fn find(&self, id: &PostId) -> Result<Option<Post>, PostPersistenceError> {
        Ok(self.store.lock().posts.get(id.as_uuid()).cloned())
    }

    async fn find_with_creator(
        &self,
        id: &PostId,
    ) -> Result<Option<PostView>, PostPersistenceError> {
        let tables = self.store.lock();
        Ok(tables
            .posts
            .get(id.as_uuid())
            .and_then(|post| join_creator(&tables, post)))
    }

    async fn list_newest_first(
        &self,
        request: PageRequest,
    ) -> Result<Vec<PostView>, PostPersistenceError> {
        let tables = self.store.lock();
        let mut feed: Vec<PostView> = tables
            .posts
            .values()
            .filter_map(|post| join_creator(&tables, post))
            .collect();
        feed.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.as_uuid().cmp(a.id.as_uuid()))
        });
        Ok(request.window(&feed).to_vec())
    }

    async fn count(&self) -> Result<u64, PostPersistenceError> {
        let total = self.store.lock().posts.len();
        Ok(u64::try_from(total).unwrap_or(u64::MAX))
    }

    async fn delete(&self, id: &PostId) -> Result<bool, PostPersistenceError> {
        Ok(self.store.lock().posts.remove(id.as_uuid()).is_some())
    }
}
