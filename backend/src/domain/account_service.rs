//! Account operations: register, login and status read/write.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::domain::ports::{
    AccountCommand, AccountQuery, PasswordHashError, PasswordHasher, UserPersistenceError,
    UserRepository,
};
use crate::domain::{
    AuthContext, AuthenticatedSession, CredentialService, DisplayName, EmailAddress, Error,
    INVALID_INPUT, LoginCredentials, Registration, User, UserId, UserProfile,
};

/// Message shared by every failed login so callers cannot probe for
/// registered addresses.
pub const LOGIN_FAILED: &str = "Email or password is incorrect.";
pub const USER_EXISTS: &str = "User already exists";
pub const USER_NOT_FOUND: &str = "User not found!";

fn map_repository_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal_cause("user repository error", message)
        }
        UserPersistenceError::DuplicateEmail { .. } => Error::conflict(USER_EXISTS),
    }
}

fn map_hash_error(error: PasswordHashError) -> Error {
    Error::internal_cause("password hashing error", error)
}

/// Account service implementing [`AccountCommand`] and [`AccountQuery`].
#[derive(Clone)]
pub struct AccountService<U, H> {
    users: Arc<U>,
    hasher: Arc<H>,
    credentials: Arc<CredentialService>,
}

impl<U, H> AccountService<U, H> {
    pub fn new(users: Arc<U>, hasher: Arc<H>, credentials: Arc<CredentialService>) -> Self {
        Self {
            users,
            hasher,
            credentials,
        }
    }
}

impl<U, H> AccountService<U, H>
where
    U: UserRepository,
    H: PasswordHasher,
{
    async fn load_caller(&self, context: &AuthContext) -> Result<User, Error> {
        let identity = context.require_authenticated()?;
        self.users
            .find_by_id(&identity.user_id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(USER_NOT_FOUND))
    }
}

#[async_trait]
impl<U, H> AccountCommand for AccountService<U, H>
where
    U: UserRepository,
    H: PasswordHasher,
{
    async fn register(&self, registration: Registration) -> Result<UserProfile, Error> {
        let valid = registration.validate().map_err(|errors| {
            Error::validation_failed(INVALID_INPUT, errors.iter().map(ToString::to_string))
        })?;

        let existing = self
            .users
            .find_by_email(&valid.email)
            .await
            .map_err(map_repository_error)?;
        if existing.is_some() {
            return Err(Error::conflict(USER_EXISTS));
        }

        let password_hash = self
            .hasher
            .hash(valid.password.as_str())
            .await
            .map_err(map_hash_error)?;
        let user = User::register(
            UserId::random(),
            valid.email,
            DisplayName::new(valid.name),
            password_hash,
        );
        self.users
            .insert(&user)
            .await
            .map_err(map_repository_error)?;

        info!(user_id = %user.id(), "registered user");
        Ok(user.profile())
    }

    async fn login(&self, credentials: LoginCredentials) -> Result<AuthenticatedSession, Error> {
        let Ok(email) = EmailAddress::new(credentials.email()) else {
            return Err(Error::unauthorized(LOGIN_FAILED));
        };
        let user = self
            .users
            .find_by_email(&email)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::unauthorized(LOGIN_FAILED))?;

        let matches = self
            .hasher
            .verify(credentials.password(), user.password_hash())
            .await
            .map_err(map_hash_error)?;
        if !matches {
            warn!(user_id = %user.id(), "rejected login with wrong password");
            return Err(Error::unauthorized(LOGIN_FAILED));
        }

        let token = self.credentials.issue(user.email(), user.id())?;
        info!(user_id = %user.id(), "issued session token");
        Ok(AuthenticatedSession {
            token,
            user_id: user.id().clone(),
        })
    }

    async fn update_status(
        &self,
        context: &AuthContext,
        status: String,
    ) -> Result<UserProfile, Error> {
        let mut user = self.load_caller(context).await?;
        user.set_status(status);
        self.users
            .save(&user)
            .await
            .map_err(map_repository_error)?;
        Ok(user.profile())
    }
}

#[async_trait]
impl<U, H> AccountQuery for AccountService<U, H>
where
    U: UserRepository,
    H: PasswordHasher,
{
    async fn status(&self, context: &AuthContext) -> Result<UserProfile, Error> {
        self.load_caller(context).await.map(|user| user.profile())
    }
}

#[cfg(test)]
#[path = "account_service_tests.rs"]
mod tests;
