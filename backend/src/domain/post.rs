//! Post data model and the read projection served to clients.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::{DisplayName, UserId};

/// Minimum character count for post titles and bodies.
pub const POST_TEXT_MIN: usize = 5;

/// Literal image value meaning "leave the stored image alone".
pub const KEEP_IMAGE_SENTINEL: &str = "undefined";

/// Validation errors raised by post value constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostValidationError {
    EmptyId,
    InvalidId,
    TitleTooShort,
    ContentTooShort,
}

impl fmt::Display for PostValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "post id must not be empty"),
            Self::InvalidId => write!(f, "post id must be a valid UUID"),
            Self::TitleTooShort => write!(f, "Title needs to be longer."),
            Self::ContentTooShort => write!(f, "Content needs to be longer."),
        }
    }
}

impl std::error::Error for PostValidationError {}

/// Stable post identifier stored as a UUID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PostId(Uuid, String);

impl PostId {
    /// Validate and construct a [`PostId`] from borrowed input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, PostValidationError> {
        let raw = id.as_ref();
        if raw.is_empty() {
            return Err(PostValidationError::EmptyId);
        }
        let parsed = Uuid::parse_str(raw).map_err(|_| PostValidationError::InvalidId)?;
        Ok(Self::from_uuid(parsed))
    }

    /// Generate a new random [`PostId`].
    pub fn random() -> Self {
        Self::from_uuid(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid, uuid.to_string())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl AsRef<str> for PostId {
    fn as_ref(&self) -> &str {
        self.1.as_str()
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<PostId> for String {
    fn from(value: PostId) -> Self {
        let PostId(_, raw) = value;
        raw
    }
}

impl TryFrom<String> for PostId {
    type Error = PostValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Opaque reference to a stored image, as returned by the image store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageRef(String);

impl ImageRef {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }
}

impl AsRef<str> for ImageRef {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl From<ImageRef> for String {
    fn from(value: ImageRef) -> Self {
        value.0
    }
}

/// Image instruction carried by a post edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageUpdate {
    /// Keep whatever image is stored.
    Keep,
    /// Point the post at a different image.
    Replace(ImageRef),
}

impl ImageUpdate {
    /// Interpret a client-supplied image value.
    ///
    /// # Examples
    /// ```
    /// use postboard::domain::{ImageRef, ImageUpdate};
    ///
    /// assert_eq!(ImageUpdate::from_supplied("undefined"), ImageUpdate::Keep);
    /// assert_eq!(
    ///     ImageUpdate::from_supplied("images/a.png"),
    ///     ImageUpdate::Replace(ImageRef::new("images/a.png")),
    /// );
    /// ```
    pub fn from_supplied(value: impl Into<String>) -> Self {
        let value = value.into();
        if value == KEEP_IMAGE_SENTINEL {
            Self::Keep
        } else {
            Self::Replace(ImageRef::new(value))
        }
    }
}

/// Title, body and image supplied when creating or editing a post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostDraft {
    pub title: String,
    pub content: String,
    pub image_url: String,
}

impl PostDraft {
    /// Collect every length violation, title first.
    pub fn validate(&self) -> Vec<PostValidationError> {
        let mut errors = Vec::new();
        if self.title.chars().count() < POST_TEXT_MIN {
            errors.push(PostValidationError::TitleTooShort);
        }
        if self.content.chars().count() < POST_TEXT_MIN {
            errors.push(PostValidationError::ContentTooShort);
        }
        errors
    }
}

/// Stored post.
///
/// ## Invariants
/// - `creator` and `created_at` never change after construction.
/// - `updated_at` is refreshed by [`Post::apply_edit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    id: PostId,
    title: String,
    content: String,
    image_url: ImageRef,
    creator: UserId,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Post {
    /// Create a new post owned by `creator`, stamped at `now`.
    pub fn create(id: PostId, draft: PostDraft, creator: UserId, now: DateTime<Utc>) -> Self {
        Self {
            id,
            title: draft.title,
            content: draft.content,
            image_url: ImageRef::new(draft.image_url),
            creator,
            created_at: now,
            updated_at: now,
        }
    }

    /// Rehydrate a post from storage.
    pub fn from_parts(
        id: PostId,
        title: String,
        content: String,
        image_url: ImageRef,
        creator: UserId,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            title,
            content,
            image_url,
            creator,
            created_at,
            updated_at,
        }
    }

    pub fn id(&self) -> &PostId {
        &self.id
    }

    pub fn title(&self) -> &str {
        self.title.as_str()
    }

    pub fn content(&self) -> &str {
        self.content.as_str()
    }

    pub fn image_url(&self) -> &ImageRef {
        &self.image_url
    }

    pub fn creator(&self) -> &UserId {
        &self.creator
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Overwrite title and content, optionally swap the image, and refresh
    /// `updated_at`.
    pub fn apply_edit(
        &mut self,
        title: String,
        content: String,
        image: ImageUpdate,
        now: DateTime<Utc>,
    ) {
        self.title = title;
        self.content = content;
        if let ImageUpdate::Replace(image) = image {
            self.image_url = image;
        }
        self.updated_at = now;
    }
}

/// Creator summary embedded in [`PostView`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PostAuthor {
    #[schema(value_type = String, example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: UserId,
    #[schema(value_type = String, example = "Ada Lovelace")]
    pub name: DisplayName,
}

/// Post joined with its creator, as served to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PostView {
    #[schema(value_type = String, example = "6f1c1a40-5a3b-4f4e-9d55-1f0e3a9f1c11")]
    pub id: PostId,
    #[schema(example = "First post")]
    pub title: String,
    #[schema(example = "Hello, world")]
    pub content: String,
    #[schema(value_type = String, example = "images/2026-01-01T00-00-00-cat.png")]
    pub image_url: ImageRef,
    pub creator: PostAuthor,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PostView {
    /// Join a post with its creator summary.
    pub fn new(post: Post, creator: PostAuthor) -> Self {
        let Post {
            id,
            title,
            content,
            image_url,
            created_at,
            updated_at,
            ..
        } = post;
        Self {
            id,
            title,
            content,
            image_url,
            creator,
            created_at,
            updated_at,
        }
    }

    /// Split the view back into the stored post and its creator summary.
    pub fn into_parts(self) -> (Post, PostAuthor) {
        let post = Post {
            id: self.id,
            title: self.title,
            content: self.content,
            image_url: self.image_url,
            creator: self.creator.id.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        };
        (post, self.creator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::{fixture, rstest};

    #[fixture]
    fn created() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 1, 9, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    #[fixture]
    fn post(created: DateTime<Utc>) -> Post {
        Post::create(
            PostId::random(),
            PostDraft {
                title: "First post".into(),
                content: "Hello, world".into(),
                image_url: "images/cat.png".into(),
            },
            UserId::random(),
            created,
        )
    }

    #[rstest]
    #[case("Title", "Body!", vec![])]
    #[case("Tit", "Body!", vec![PostValidationError::TitleTooShort])]
    #[case("Title", "", vec![PostValidationError::ContentTooShort])]
    #[case(
        "",
        "x",
        vec![PostValidationError::TitleTooShort, PostValidationError::ContentTooShort]
    )]
    fn draft_validation(
        #[case] title: &str,
        #[case] content: &str,
        #[case] expected: Vec<PostValidationError>,
    ) {
        let draft = PostDraft {
            title: title.into(),
            content: content.into(),
            image_url: String::new(),
        };
        assert_eq!(draft.validate(), expected);
    }

    #[rstest]
    fn length_counts_characters_not_bytes() {
        let draft = PostDraft {
            title: "héllo".into(),
            content: "ünïcø".into(),
            image_url: String::new(),
        };
        assert!(draft.validate().is_empty());
    }

    #[rstest]
    fn edit_with_sentinel_keeps_image(mut post: Post, created: DateTime<Utc>) {
        let later = created + chrono::TimeDelta::minutes(5);
        post.apply_edit(
            "Second title".into(),
            "Second body".into(),
            ImageUpdate::from_supplied(KEEP_IMAGE_SENTINEL),
            later,
        );

        assert_eq!(post.image_url().as_ref(), "images/cat.png");
        assert_eq!(post.title(), "Second title");
        assert_eq!(post.created_at(), created);
        assert_eq!(post.updated_at(), later);
    }

    #[rstest]
    fn edit_with_new_path_replaces_image(mut post: Post, created: DateTime<Utc>) {
        post.apply_edit(
            "Second title".into(),
            "Second body".into(),
            ImageUpdate::from_supplied("images/dog.png"),
            created,
        );
        assert_eq!(post.image_url().as_ref(), "images/dog.png");
    }

    #[rstest]
    fn post_id_rejects_garbage() {
        assert_eq!(PostId::new(""), Err(PostValidationError::EmptyId));
        assert_eq!(PostId::new("p1"), Err(PostValidationError::InvalidId));
    }

    #[rstest]
    fn view_serialises_camel_case(post: Post) {
        let author = PostAuthor {
            id: post.creator().clone(),
            name: DisplayName::new("Ada"),
        };
        let value = serde_json::to_value(PostView::new(post, author)).expect("serialise view");

        assert_eq!(value["imageUrl"], "images/cat.png");
        assert_eq!(value["creator"]["name"], "Ada");
        assert_eq!(value["createdAt"], "2026-01-01T09:00:00Z");
    }
}
