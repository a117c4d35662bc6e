//! Domain primitives, services and ports.
//!
//! Purpose: hold the transport-agnostic rules of the post board. Inbound
//! adapters call the driving ports in [`ports`]; outbound adapters implement
//! the driven ones. Nothing here depends on HTTP or a concrete store.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - User, UserProfile, Post, PostView: principal and post models.
//! - CredentialService: token issue/verify against an injected clock.
//! - AuthContext, require_owner: the ownership guard.
//! - AccountService, PostService, ImageService: operation handlers.

pub mod account_service;
pub mod auth;
pub mod credentials;
pub mod error;
pub mod guard;
pub mod image_service;
pub mod ports;
pub mod post;
pub mod post_service;
pub mod trace_id;
pub mod user;

pub use self::account_service::AccountService;
pub use self::auth::{
    AuthenticatedSession, Identity, LoginCredentials, Registration, RegistrationError,
    SessionToken, ValidRegistration,
};
pub use self::credentials::{CredentialService, DEFAULT_TOKEN_TTL_SECONDS};
pub use self::error::{Error, ErrorCode, ErrorValidationError, INVALID_INPUT};
pub use self::guard::{AuthContext, NOT_AUTHENTICATED, require_owner};
pub use self::image_service::ImageService;
pub use self::post::{
    ImageRef, ImageUpdate, KEEP_IMAGE_SENTINEL, Post, PostAuthor, PostDraft, PostId,
    PostValidationError, PostView,
};
pub use self::post_service::PostService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    DEFAULT_STATUS, DisplayName, EmailAddress, PasswordHash, User, UserId, UserProfile,
    UserValidationError,
};

