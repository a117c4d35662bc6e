//! Driven port for user persistence.
use async_trait::async_trait;

use crate::domain::{EmailAddress, User, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// Another user already holds the e-mail address.
        DuplicateEmail { email: String } => "user with email {email} already exists",
    }
}

/// Storage for registered users, addressed by id or e-mail.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a newly registered user.
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError>;

    /// Overwrite the stored copy of an existing user.
    async fn save(&self, user: &User) -> Result<(), UserPersistenceError>;

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Exact-match lookup on the stored address.
    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserPersistenceError>;
}
