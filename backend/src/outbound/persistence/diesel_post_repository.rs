//! PostgreSQL-backed `PostRepository` implementation using Diesel ORM.
//!
//! Feed reads join `posts` with `users` so each row carries its creator
//! summary. The join is inner: a post whose creator row is gone is skipped.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use pagination::PageRequest;

use crate::domain::ports::{PostPersistenceError, PostRepository};
use crate::domain::{DisplayName, ImageRef, Post, PostAuthor, PostId, PostView, UserId};

use super::diesel_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{CreatorRow, NewPostRow, PostRow, PostUpdate};
use super::pool::{DbPool, PoolError};
use super::schema::{posts, users};

/// Diesel-backed implementation of the [`PostRepository`] port.
#[derive(Clone)]
pub struct DieselPostRepository {
    pool: DbPool,
}

impl DieselPostRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> PostPersistenceError {
    map_basic_pool_error(error, PostPersistenceError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> PostPersistenceError {
    map_basic_diesel_error(
        error,
        PostPersistenceError::query,
        PostPersistenceError::connection,
    )
}

fn row_to_post(row: PostRow) -> Post {
    Post::from_parts(
        PostId::from_uuid(row.id),
        row.title,
        row.content,
        ImageRef::new(row.image_url),
        UserId::from_uuid(row.creator_id),
        row.created_at,
        row.updated_at,
    )
}

fn rows_to_view((post, creator): (PostRow, CreatorRow)) -> PostView {
    let author = PostAuthor {
        id: UserId::from_uuid(creator.id),
        name: DisplayName::new(creator.name),
    };
    PostView::new(row_to_post(post), author)
}

/// Saturating conversion for `LIMIT`/`OFFSET`, which PostgreSQL takes as
/// `bigint`.
fn to_sql_bound(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

#[async_trait]
impl PostRepository for DieselPostRepository {
    async fn insert(&self, post: &Post) -> Result<(), PostPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = NewPostRow {
            id: *post.id().as_uuid(),
            title: post.title(),
            content: post.content(),
            image_url: post.image_url().as_ref(),
            creator_id: *post.creator().as_uuid(),
            created_at: post.created_at(),
            updated_at: post.updated_at(),
        };

        diesel::insert_into(posts::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn save(&self, post: &Post) -> Result<(), PostPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let update = PostUpdate {
            title: post.title(),
            content: post.content(),
            image_url: post.image_url().as_ref(),
            updated_at: post.updated_at(),
        };

        let updated = diesel::update(posts::table.filter(posts::id.eq(post.id().as_uuid())))
            .set(&update)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        if updated == 0 {
            return Err(PostPersistenceError::query("post not found for update"));
        }
        Ok(())
    }

    async fn find(&self, id: &PostId) -> Result<Option<Post>, PostPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<PostRow> = posts::table
            .filter(posts::id.eq(id.as_uuid()))
            .select(PostRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        Ok(row.map(row_to_post))
    }

    async fn find_with_creator(
        &self,
        id: &PostId,
    ) -> Result<Option<PostView>, PostPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<(PostRow, CreatorRow)> = posts::table
            .inner_join(users::table)
            .filter(posts::id.eq(id.as_uuid()))
            .select((PostRow::as_select(), CreatorRow::as_select()))
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        Ok(row.map(rows_to_view))
    }

    async fn list_newest_first(
        &self,
        request: PageRequest,
    ) -> Result<Vec<PostView>, PostPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<(PostRow, CreatorRow)> = posts::table
            .inner_join(users::table)
            .order((posts::created_at.desc(), posts::id.desc()))
            .offset(to_sql_bound(request.offset()))
            .limit(to_sql_bound(request.limit()))
            .select((PostRow::as_select(), CreatorRow::as_select()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows.into_iter().map(rows_to_view).collect())
    }

    async fn count(&self) -> Result<u64, PostPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let total: i64 = posts::table
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        u64::try_from(total).map_err(|_| PostPersistenceError::query("negative post count"))
    }

    async fn delete(&self, id: &PostId) -> Result<bool, PostPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let deleted = diesel::delete(posts::table.filter(posts::id.eq(id.as_uuid())))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(deleted == 1)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use rstest::rstest;
    use uuid::Uuid;

    use super::*;

    #[rstest]
    #[case(0, 0)]
    #[case(40, 40)]
    #[case(u64::MAX, i64::MAX)]
    fn sql_bounds_saturate(#[case] value: u64, #[case] expected: i64) {
        assert_eq!(to_sql_bound(value), expected);
    }

    #[rstest]
    fn joined_rows_become_views() {
        let created = Utc
            .with_ymd_and_hms(2026, 1, 2, 3, 4, 5)
            .single()
            .expect("valid timestamp");
        let creator_id = Uuid::new_v4();
        let post = PostRow {
            id: Uuid::new_v4(),
            title: "Title".into(),
            content: "Content".into(),
            image_url: "images/cat.png".into(),
            creator_id,
            created_at: created,
            updated_at: created,
        };
        let creator = CreatorRow {
            id: creator_id,
            name: "Ada".into(),
        };

        let view = rows_to_view((post, creator));

        assert_eq!(view.creator.id, UserId::from_uuid(creator_id));
        assert_eq!(view.creator.name.as_ref(), "Ada");
        assert_eq!(view.image_url.as_ref(), "images/cat.png");
        assert_eq!(view.created_at, created);
    }
}
