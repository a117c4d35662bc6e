use async_trait::async_trait;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{EmailAddress, User, UserId};

use super::MemoryStore;

/// In-memory [`UserRepository`] with the same e-mail uniqueness rule as the
/// database index.
#[derive(Debug, Clone)]
pub struct MemoryUserRepository {
    store: MemoryStore,
}

impl MemoryUserRepository {
    pub(super) fn new(store: MemoryStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut tables = self.store.lock();
        if tables.users.values().any(|stored| stored.email() == user.email()) {
            return Err(UserPersistenceError::duplicate_email(user.email().as_ref()));
        }
        tables.users.insert(*user.id().as_uuid(), user.clone());
        Ok(())
    }

    async fn save(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut tables = self.store.lock();
        match tables.users.get_mut(user.id().as_uuid()) {
            Some(stored) => {
                *stored = user.clone();
                Ok(())
            }
            None => Err(UserPersistenceError::query("user not found for update")),
        }
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        Ok(self.store.lock().users.get(id.as_uuid()).cloned())
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserPersistenceError> {
        Ok(self
            .store
            .lock()
            .users
            .values()
            .find(|user| user.email() == email)
            .cloned())
    }
}
