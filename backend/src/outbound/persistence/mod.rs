//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repositories translate between Diesel row models and domain types and
//! nothing more. Row structs (`models.rs`) and table definitions
//! (`schema.rs`) stay private to this module. Connections come from a `bb8`
//! pool driven by `diesel-async`.
//!
//! # Example
//!
//! ```no_run
//! # async fn wire() -> Result<(), Box<dyn std::error::Error>> {
//! use postboard::outbound::persistence::{
//!     DbPool, DieselPostRepository, DieselUserRepository, PoolConfig, run_migrations,
//! };
//!
//! let url = "postgres://localhost/postboard";
//! run_migrations(url).await?;
//! let pool = DbPool::new(PoolConfig::new(url)).await?;
//! let users = DieselUserRepository::new(pool.clone());
//! let posts = DieselPostRepository::new(pool);
//! # let _ = (users, posts);
//! # Ok(())
//! # }
//! ```

mod diesel_error_mapping;
mod diesel_post_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_post_repository::DieselPostRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MIGRATIONS, MigrationError, run_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
