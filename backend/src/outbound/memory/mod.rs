//! In-process adapters for the user and post repositories.
//!
//! Used when no database URL is configured and by the integration tests.
//! Both repositories share one [`MemoryStore`] so post reads can join the
//! creator the same way the PostgreSQL adapter does. Contents are lost when
//! the process exits.

mod post_repository;
mod user_repository;

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use uuid::Uuid;

use crate::domain::{Post, User};

pub use post_repository::MemoryPostRepository;
pub use user_repository::MemoryUserRepository;

#[derive(Debug, Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    posts: HashMap<Uuid, Post>,
}

/// Shared backing store for the in-memory repositories.
///
/// # Examples
/// ```
/// use postboard::outbound::memory::MemoryStore;
///
/// let store = MemoryStore::new();
/// let users = store.users();
/// let posts = store.posts();
/// # let _ = (users, posts);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// User repository over this store.
    pub fn users(&self) -> MemoryUserRepository {
        MemoryUserRepository::new(self.clone())
    }

    /// Post repository over this store.
    pub fn posts(&self) -> MemoryPostRepository {
        MemoryPostRepository::new(self.clone())
    }

    // A poisoned lock only means another request panicked mid-write; the
    // maps themselves are still usable.
    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
