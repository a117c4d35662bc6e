//! Layered server settings and the resolved runtime configuration.
//!
//! [`ServerSettings`] is loaded by OrthoConfig from CLI flags, `POSTBOARD_*`
//! environment variables and configuration files. [`ServerConfig`] is the
//! validated form handed to the server builder.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use chrono::TimeDelta;
use ortho_config::OrthoConfig;
use pagination::{PageSize, PaginationError};
use postboard::domain::DEFAULT_TOKEN_TTL_SECONDS;
use postboard::outbound::persistence::DbPool;
use postboard::outbound::security::{
    BuildMode, TokenSecret, TokenSecretError, TokenSecretSource, resolve_token_secret,
};
use postboard::outbound::storage::DEFAULT_IMAGE_PREFIX;
use serde::Deserialize;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_IMAGE_DIR: &str = "images";
const DEFAULT_UPLOAD_LIMIT_BYTES: usize = 5 * 1024 * 1024;

/// Settings read at start-up.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "POSTBOARD")]
pub struct ServerSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL; in-memory stores are used when absent.
    pub database_url: Option<String>,
    /// Inline token signing secret.
    pub token_secret: Option<String>,
    /// File holding the token signing secret.
    pub token_secret_file: Option<PathBuf>,
    /// Fall back to a per-process secret when the secret file is unreadable.
    #[ortho_config(default = false)]
    pub allow_ephemeral_secret: bool,
    /// Session token lifetime in seconds.
    pub token_ttl_seconds: Option<i64>,
    /// Directory uploaded images are written to.
    pub image_dir: Option<PathBuf>,
    /// Public path prefix for stored images.
    pub image_prefix: Option<String>,
    /// bcrypt work factor.
    pub bcrypt_cost: Option<u32>,
    /// Largest accepted request body in bytes.
    pub upload_limit_bytes: Option<usize>,
    /// Posts per feed page.
    pub page_size: Option<u32>,
}

/// Settings that failed validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid bind address '{value}': {source}")]
    BindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
    #[error("token TTL must be positive, got {0} seconds")]
    TokenTtl(i64),
    #[error("invalid page size: {0}")]
    PageSize(#[from] PaginationError),
    #[error(transparent)]
    TokenSecret(#[from] TokenSecretError),
}

impl ServerSettings {
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        let value = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        value.parse().map_err(|source| ConfigError::BindAddr {
            value: value.to_owned(),
            source,
        })
    }

    pub fn token_ttl(&self) -> Result<TimeDelta, ConfigError> {
        match self.token_ttl_seconds.unwrap_or(DEFAULT_TOKEN_TTL_SECONDS) {
            seconds if seconds > 0 => Ok(TimeDelta::seconds(seconds)),
            seconds => Err(ConfigError::TokenTtl(seconds)),
        }
    }

    pub fn image_dir(&self) -> &Path {
        self.image_dir
            .as_deref()
            .unwrap_or_else(|| Path::new(DEFAULT_IMAGE_DIR))
    }

    pub fn image_prefix(&self) -> &str {
        self.image_prefix.as_deref().unwrap_or(DEFAULT_IMAGE_PREFIX)
    }

    pub fn bcrypt_cost(&self) -> u32 {
        self.bcrypt_cost.unwrap_or(bcrypt::DEFAULT_COST)
    }

    pub fn upload_limit_bytes(&self) -> usize {
        self.upload_limit_bytes.unwrap_or(DEFAULT_UPLOAD_LIMIT_BYTES)
    }

    pub fn page_size(&self) -> Result<PageSize, ConfigError> {
        match self.page_size {
            Some(size) => Ok(PageSize::new(size)?),
            None => Ok(PageSize::default()),
        }
    }

    /// Resolve the token signing secret for `mode`.
    pub fn token_secret(&self, mode: BuildMode) -> Result<TokenSecret, ConfigError> {
        let source = TokenSecretSource {
            value: self.token_secret.as_deref(),
            file: self.token_secret_file.as_deref(),
            allow_ephemeral: self.allow_ephemeral_secret,
        };
        Ok(resolve_token_secret(source, mode)?)
    }
}

/// Validated configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) token_secret: TokenSecret,
    pub(crate) token_ttl: TimeDelta,
    pub(crate) image_dir: PathBuf,
    pub(crate) image_prefix: String,
    pub(crate) bcrypt_cost: u32,
    pub(crate) upload_limit_bytes: usize,
    pub(crate) page_size: PageSize,
}

impl ServerConfig {
    /// Validate `settings` into a runtime configuration without a database.
    pub fn from_settings(settings: &ServerSettings, mode: BuildMode) -> Result<Self, ConfigError> {
        Ok(Self {
            bind_addr: settings.bind_addr()?,
            db_pool: None,
            token_secret: settings.token_secret(mode)?,
            token_ttl: settings.token_ttl()?,
            image_dir: settings.image_dir().to_path_buf(),
            image_prefix: settings.image_prefix().to_owned(),
            bcrypt_cost: settings.bcrypt_cost(),
            upload_limit_bytes: settings.upload_limit_bytes(),
            page_size: settings.page_size()?,
        })
    }

    /// Attach a database connection pool; repositories switch from memory to
    /// PostgreSQL.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
