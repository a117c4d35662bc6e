//! Post image uploads.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{info, warn};

use crate::domain::ports::{
    ImageCommand, ImageStore, ImageStoreError, ImageUpload, ImageUploadOutcome,
};
use crate::domain::{AuthContext, Error, ImageRef};

fn map_store_error(error: ImageStoreError) -> Error {
    match error {
        ImageStoreError::InvalidName { name } => {
            Error::invalid_request(format!("Invalid image file name: {name}"))
        }
        ImageStoreError::Io { message } => Error::internal_cause("image storage error", message),
    }
}

/// Image service implementing [`ImageCommand`].
///
/// Stored files are prefixed with the upload time in milliseconds so repeated
/// uploads of the same file name never overwrite each other.
#[derive(Clone)]
pub struct ImageService<I> {
    images: Arc<I>,
    clock: Arc<dyn Clock>,
}

impl<I> ImageService<I> {
    /// Create a service over an image store.
    pub fn new(images: Arc<I>, clock: Arc<dyn Clock>) -> Self {
        Self { images, clock }
    }
}

#[async_trait]
impl<I> ImageCommand for ImageService<I>
where
    I: ImageStore,
{
    async fn store(
        &self,
        context: &AuthContext,
        upload: ImageUpload,
    ) -> Result<ImageUploadOutcome, Error> {
        context.require_authenticated()?;
        let ImageUpload {
            file_name,
            bytes,
            old_path,
        } = upload;
        let Some(bytes) = bytes.filter(|bytes| !bytes.is_empty()) else {
            return Ok(ImageUploadOutcome::NoFile);
        };

        let stamped = format!("{}-{file_name}", self.clock.utc().timestamp_millis());
        let stored = self
            .images
            .put(&stamped, &bytes)
            .await
            .map_err(map_store_error)?;

        if let Some(old) = old_path.filter(|path| !path.is_empty()) {
            let old = ImageRef::new(old);
            if let Err(err) = self.images.clear(&old).await {
                warn!(error = %err, image = old.as_ref(), "failed to release superseded image");
            }
        }

        info!(image = stored.as_ref(), size = bytes.len(), "stored post image");
        Ok(ImageUploadOutcome::Stored(stored))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{TimeZone, Utc};
    use rstest::{fixture, rstest};

    use super::*;
    use crate::domain::ports::MockImageStore;
    use crate::domain::{ErrorCode, Identity, UserId};
    use crate::test_support::MutableClock;

    #[fixture]
    fn clock() -> Arc<MutableClock> {
        Arc::new(MutableClock::new(
            Utc.timestamp_millis_opt(1_700_000_000_123)
                .single()
                .expect("valid timestamp"),
        ))
    }

    fn signed_in() -> AuthContext {
        AuthContext::authenticated(Identity {
            user_id: UserId::random(),
            email: "ada@example.com".into(),
        })
    }

    fn upload(bytes: Option<Vec<u8>>, old_path: Option<&str>) -> ImageUpload {
        ImageUpload {
            file_name: "cat.png".into(),
            bytes,
            old_path: old_path.map(str::to_owned),
        }
    }

    #[rstest]
    #[tokio::test]
    async fn anonymous_upload_is_rejected(clock: Arc<MutableClock>) {
        let mut images = MockImageStore::new();
        images.expect_put().times(0);

        let err = ImageService::new(Arc::new(images), clock)
            .store(&AuthContext::anonymous(), upload(Some(vec![1]), None))
            .await
            .expect_err("anonymous");

        assert_eq!(err.code(), ErrorCode::Unauthorized);
    }

    #[rstest]
    #[case::absent(None)]
    #[case::empty(Some(Vec::new()))]
    #[tokio::test]
    async fn missing_file_touches_nothing(
        clock: Arc<MutableClock>,
        #[case] bytes: Option<Vec<u8>>,
    ) {
        let mut images = MockImageStore::new();
        images.expect_put().times(0);
        images.expect_clear().times(0);

        let outcome = ImageService::new(Arc::new(images), clock)
            .store(&signed_in(), upload(bytes, Some("images/old.png")))
            .await
            .expect("no file is not an error");

        assert_eq!(outcome, ImageUploadOutcome::NoFile);
    }

    #[rstest]
    #[tokio::test]
    async fn stores_under_timestamped_name_and_releases_old(clock: Arc<MutableClock>) {
        let mut images = MockImageStore::new();
        images
            .expect_put()
            .withf(|name, bytes| name == "1700000000123-cat.png" && bytes == [7, 8])
            .times(1)
            .return_once(|name, _| Ok(ImageRef::new(format!("images/{name}"))));
        images
            .expect_clear()
            .withf(|image| image.as_ref() == "images/old.png")
            .times(1)
            .return_once(|_| Err(ImageStoreError::io("busy")));

        let outcome = ImageService::new(Arc::new(images), clock)
            .store(&signed_in(), upload(Some(vec![7, 8]), Some("images/old.png")))
            .await
            .expect("stored despite release failure");

        assert_eq!(
            outcome,
            ImageUploadOutcome::Stored(ImageRef::new("images/1700000000123-cat.png"))
        );
    }

    #[rstest]
    #[tokio::test]
    async fn unsafe_name_is_invalid_request(clock: Arc<MutableClock>) {
        let mut images = MockImageStore::new();
        images
            .expect_put()
            .return_once(|name, _| Err(ImageStoreError::invalid_name(name)));

        let err = ImageService::new(Arc::new(images), clock)
            .store(&signed_in(), upload(Some(vec![1]), None))
            .await
            .expect_err("rejected name");

        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }
}
