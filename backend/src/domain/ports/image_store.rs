//! Driven port for binary image storage.
use async_trait::async_trait;

use crate::domain::ImageRef;

use super::define_port_error;

define_port_error! {
    /// Errors raised by image store adapters.
    pub enum ImageStoreError {
        /// The supplied file name cannot be stored safely.
        InvalidName { name: String } => "invalid image file name: {name}",
        /// The backing storage rejected the operation.
        Io { message: String } => "image storage failed: {message}",
    }
}

/// Put/clear storage for uploaded images keyed by an opaque path.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Store `bytes` under `file_name` and return the path clients should
    /// reference.
    async fn put(&self, file_name: &str, bytes: &[u8]) -> Result<ImageRef, ImageStoreError>;

    /// Remove a previously stored image. Missing files are not an error.
    async fn clear(&self, image: &ImageRef) -> Result<(), ImageStoreError>;
}
