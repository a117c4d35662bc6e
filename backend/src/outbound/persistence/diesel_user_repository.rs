//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.
//!
//! E-mail uniqueness is enforced by the `users_email_key` index; a violation
//! on insert surfaces as [`UserPersistenceError::DuplicateEmail`].

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;
use uuid::Uuid;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{DisplayName, EmailAddress, PasswordHash, PostId, User, UserId};

use super::diesel_error_mapping::{
    is_unique_violation, map_basic_diesel_error, map_basic_pool_error,
};
use super::models::{NewUserRow, UserRow, UserUpdate};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel-backed implementation of the [`UserRepository`] port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserPersistenceError {
    map_basic_pool_error(error, UserPersistenceError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> UserPersistenceError {
    map_basic_diesel_error(
        error,
        UserPersistenceError::query,
        UserPersistenceError::connection,
    )
}

fn post_uuids(user: &User) -> Vec<Uuid> {
    user.posts().iter().map(|post| *post.as_uuid()).collect()
}

fn row_to_user(row: UserRow) -> Result<User, UserPersistenceError> {
    let email = EmailAddress::new(row.email).map_err(|err| {
        warn!(user_id = %row.id, error = %err, "stored user has an invalid email");
        UserPersistenceError::query("stored user has an invalid email")
    })?;

    Ok(User::from_parts(
        UserId::from_uuid(row.id),
        email,
        DisplayName::new(row.name),
        PasswordHash::new(row.password_hash),
        row.status,
        row.post_ids.into_iter().map(PostId::from_uuid).collect(),
    ))
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = NewUserRow {
            id: *user.id().as_uuid(),
            email: user.email().as_ref(),
            name: user.name().as_ref(),
            password_hash: user.password_hash().as_str(),
            status: user.status(),
            post_ids: post_uuids(user),
        };

        diesel::insert_into(users::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| {
                if is_unique_violation(&err) {
                    UserPersistenceError::duplicate_email(user.email().as_ref())
                } else {
                    map_diesel_error(err)
                }
            })
    }

    async fn save(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let update = UserUpdate {
            name: user.name().as_ref(),
            password_hash: user.password_hash().as_str(),
            status: user.status(),
            post_ids: post_uuids(user),
        };

        let updated = diesel::update(users::table.filter(users::id.eq(user.id().as_uuid())))
            .set(&update)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        if updated == 0 {
            return Err(UserPersistenceError::query("user not found for update"));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<UserRow> = users::table
            .filter(users::id.eq(id.as_uuid()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_user).transpose()
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<UserRow> = users::table
            .filter(users::email.eq(email.as_ref()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_user).transpose()
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn row(email: &str) -> UserRow {
        UserRow {
            id: Uuid::new_v4(),
            email: email.to_owned(),
            name: "Ada".to_owned(),
            password_hash: "$2b$04$hash".to_owned(),
            status: "I am new!".to_owned(),
            post_ids: vec![Uuid::new_v4()],
        }
    }

    #[rstest]
    fn row_converts_to_user() {
        let stored = row("ada@example.com");
        let post = stored.post_ids[0];
        let user = row_to_user(stored).expect("valid row");

        assert_eq!(user.email().as_ref(), "ada@example.com");
        assert_eq!(user.status(), "I am new!");
        assert_eq!(user.posts(), [PostId::from_uuid(post)]);
    }

    #[rstest]
    fn invalid_stored_email_is_a_query_error() {
        let err = row_to_user(row("not-an-address")).expect_err("invalid email");
        assert!(matches!(err, UserPersistenceError::Query { .. }));
    }
}
