//! Driving port for uploading post images.

use async_trait::async_trait;

use crate::domain::{AuthContext, Error, ImageRef};

/// Upload request as received from a client.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ImageUpload {
    pub file_name: String,
    /// `None` or empty when the client sent no file.
    pub bytes: Option<Vec<u8>>,
    /// Image the new upload supersedes.
    pub old_path: Option<String>,
}

/// Result of an upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageUploadOutcome {
    /// Nothing was stored and nothing was cleared.
    NoFile,
    Stored(ImageRef),
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageCommand: Send + Sync {
    async fn store(
        &self,
        context: &AuthContext,
        upload: ImageUpload,
    ) -> Result<ImageUploadOutcome, Error>;
}
