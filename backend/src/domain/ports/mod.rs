//! Domain ports for the hexagonal boundary.
//!
//! Driving ports (`*Command`, `*Query`) are called by inbound adapters.
//! Driven ports (repositories, stores, hashing, token codec) are implemented
//! by outbound adapters and consumed by domain services.

mod macros;
pub(crate) use macros::define_port_error;

mod account_command;
mod account_query;
mod image_command;
mod image_store;
mod password_hasher;
mod post_command;
mod post_query;
mod post_repository;
mod token_codec;
mod user_repository;

#[cfg(test)]
pub use account_command::MockAccountCommand;
pub use account_command::AccountCommand;
#[cfg(test)]
pub use account_query::MockAccountQuery;
pub use account_query::AccountQuery;
#[cfg(test)]
pub use image_command::MockImageCommand;
pub use image_command::{ImageCommand, ImageUpload, ImageUploadOutcome};
#[cfg(test)]
pub use image_store::MockImageStore;
pub use image_store::{ImageStore, ImageStoreError};
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHashError, PasswordHasher};
#[cfg(test)]
pub use post_command::MockPostCommand;
pub use post_command::PostCommand;
#[cfg(test)]
pub use post_query::MockPostQuery;
pub use post_query::PostQuery;
#[cfg(test)]
pub use post_repository::MockPostRepository;
pub use post_repository::{PostPersistenceError, PostRepository};
#[cfg(test)]
pub use token_codec::MockTokenCodec;
pub use token_codec::{SessionClaims, TokenCodec, TokenCodecError};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
