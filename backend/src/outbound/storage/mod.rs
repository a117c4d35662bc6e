//! Filesystem image store built on `cap-std`.
//!
//! All file access goes through a capability handle on the image directory,
//! so a crafted file name can never reach outside it.

use std::io;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use cap_std::{ambient_authority, fs::Dir};
use tracing::debug;

use crate::domain::ImageRef;
use crate::domain::ports::{ImageStore, ImageStoreError};

/// Public path prefix used when none is configured.
pub const DEFAULT_IMAGE_PREFIX: &str = "images";

/// [`ImageStore`] writing uploads into one flat directory.
///
/// Stored images are referenced as `<prefix>/<file name>`.
#[derive(Debug, Clone)]
pub struct FsImageStore {
    dir: Arc<Dir>,
    prefix: String,
}

impl FsImageStore {
    /// Open (creating if needed) the image directory at `root`.
    ///
    /// # Errors
    /// Returns the underlying I/O error when the directory cannot be created
    /// or opened.
    ///
    /// # Examples
    /// ```
    /// use postboard::outbound::storage::FsImageStore;
    ///
    /// let root = tempfile::tempdir().unwrap();
    /// let store = FsImageStore::open(root.path(), "images").unwrap();
    /// assert_eq!(store.prefix(), "images");
    /// ```
    pub fn open(root: &Path, prefix: impl Into<String>) -> io::Result<Self> {
        Dir::create_ambient_dir_all(root, ambient_authority())?;
        let dir = Dir::open_ambient_dir(root, ambient_authority())?;
        Ok(Self {
            dir: Arc::new(dir),
            prefix: prefix.into().trim_end_matches('/').to_owned(),
        })
    }

    pub fn prefix(&self) -> &str {
        self.prefix.as_str()
    }

    fn reference(&self, name: &str) -> ImageRef {
        ImageRef::new(format!("{}/{name}", self.prefix))
    }

    fn file_name<'a>(&self, image: &'a ImageRef) -> Option<&'a str> {
        image
            .as_ref()
            .strip_prefix(self.prefix.as_str())
            .and_then(|rest| rest.strip_prefix('/'))
    }
}

fn is_safe_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\', '\0'])
}

fn io_error(error: impl std::fmt::Display) -> ImageStoreError {
    ImageStoreError::io(error.to_string())
}

#[async_trait]
impl ImageStore for FsImageStore {
    async fn put(&self, file_name: &str, bytes: &[u8]) -> Result<ImageRef, ImageStoreError> {
        if !is_safe_name(file_name) {
            return Err(ImageStoreError::invalid_name(file_name));
        }
        let dir = Arc::clone(&self.dir);
        let name = file_name.to_owned();
        let bytes = bytes.to_vec();
        tokio::task::spawn_blocking(move || dir.write(&name, bytes))
            .await
            .map_err(io_error)?
            .map_err(io_error)?;
        Ok(self.reference(file_name))
    }

    async fn clear(&self, image: &ImageRef) -> Result<(), ImageStoreError> {
        let name = match self.file_name(image) {
            Some(name) if is_safe_name(name) => name.to_owned(),
            _ => return Err(ImageStoreError::invalid_name(image.as_ref())),
        };
        let dir = Arc::clone(&self.dir);
        let removed = tokio::task::spawn_blocking(move || dir.remove_file(&name))
            .await
            .map_err(io_error)?;
        match removed {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                debug!(image = image.as_ref(), "image already absent");
                Ok(())
            }
            Err(error) => Err(io_error(error)),
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    use super::*;

    #[fixture]
    fn root() -> TempDir {
        tempfile::tempdir().expect("temp dir")
    }

    fn store(root: &TempDir) -> FsImageStore {
        FsImageStore::open(root.path(), DEFAULT_IMAGE_PREFIX).expect("open store")
    }

    #[rstest]
    #[tokio::test]
    async fn put_writes_file_and_returns_prefixed_path(root: TempDir) {
        let stored = store(&root)
            .put("1700000000123-cat.png", b"png")
            .await
            .expect("put");

        assert_eq!(stored.as_ref(), "images/1700000000123-cat.png");
        let on_disk =
            std::fs::read(root.path().join("1700000000123-cat.png")).expect("file written");
        assert_eq!(on_disk, b"png");
    }

    #[rstest]
    #[case("")]
    #[case(".")]
    #[case("..")]
    #[case("../escape.png")]
    #[case("nested/cat.png")]
    #[case("back\\slash.png")]
    #[tokio::test]
    async fn unsafe_names_are_rejected(root: TempDir, #[case] name: &str) {
        let err = store(&root).put(name, b"png").await.expect_err("rejected");
        assert_eq!(err, ImageStoreError::invalid_name(name));
    }

    #[rstest]
    #[tokio::test]
    async fn clear_removes_file_and_tolerates_absence(root: TempDir) {
        let store = store(&root);
        let stored = store.put("cat.png", b"png").await.expect("put");

        store.clear(&stored).await.expect("first clear");
        assert!(!root.path().join("cat.png").exists());
        store.clear(&stored).await.expect("second clear is a no-op");
    }

    #[rstest]
    #[case("elsewhere/cat.png")]
    #[case("images/../secret")]
    #[case("cat.png")]
    #[tokio::test]
    async fn clear_rejects_foreign_paths(root: TempDir, #[case] path: &str) {
        let err = store(&root)
            .clear(&ImageRef::new(path))
            .await
            .expect_err("foreign path");
        assert!(matches!(err, ImageStoreError::InvalidName { .. }));
    }

    #[rstest]
    fn trailing_slash_in_prefix_is_ignored(root: TempDir) {
        let store = FsImageStore::open(root.path(), "media/").expect("open store");
        assert_eq!(store.reference("a.png").as_ref(), "media/a.png");
    }
}
