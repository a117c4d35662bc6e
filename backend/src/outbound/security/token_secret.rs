//! Session token signing secret loading.
//!
//! Release builds need an explicit secret of at least
//! [`TOKEN_SECRET_MIN_LEN`] bytes. Debug builds fall back to a random secret
//! that lives only as long as the process, so tokens stop verifying after a
//! restart.

use std::path::{Path, PathBuf};

use rand::RngCore;
use tracing::warn;
use zeroize::Zeroizing;

/// Minimum secret length accepted in release builds (256 bits).
pub const TOKEN_SECRET_MIN_LEN: usize = 32;
const EPHEMERAL_SECRET_LEN: usize = 64;

/// Build mode used to decide how strict secret loading is.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Debug builds tolerate missing secrets and warn instead.
    Debug,
    /// Release builds require an explicit secret.
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
    ///
    /// # Examples
    ///
    /// ```
    /// use postboard::outbound::security::BuildMode;
    ///
    /// let mode = BuildMode::from_debug_assertions();
    /// if cfg!(debug_assertions) {
    ///     assert_eq!(mode, BuildMode::Debug);
    /// } else {
    ///     assert_eq!(mode, BuildMode::Release);
    /// }
    /// ```
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }
}

/// Secret bytes used to sign session tokens; wiped on drop.
pub struct TokenSecret {
    bytes: Zeroizing<Vec<u8>>,
    ephemeral: bool,
}

impl TokenSecret {
    fn configured(bytes: Vec<u8>) -> Self {
        Self {
            bytes: Zeroizing::new(bytes),
            ephemeral: false,
        }
    }

    fn generate() -> Self {
        let mut bytes = vec![0_u8; EPHEMERAL_SECRET_LEN];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self {
            bytes: Zeroizing::new(bytes),
            ephemeral: true,
        }
    }

    pub fn expose(&self) -> &[u8] {
        &self.bytes
    }

    /// Whether the secret was generated for this process only.
    pub fn is_ephemeral(&self) -> bool {
        self.ephemeral
    }
}

impl std::fmt::Debug for TokenSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSecret")
            .field("len", &self.bytes.len())
            .field("ephemeral", &self.ephemeral)
            .finish()
    }
}

/// Where the secret may come from, in priority order.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenSecretSource<'a> {
    /// Inline secret value.
    pub value: Option<&'a str>,
    /// File holding the secret bytes.
    pub file: Option<&'a Path>,
    /// Fall back to a generated secret when the file cannot be read.
    pub allow_ephemeral: bool,
}

/// Errors raised while loading the token secret.
#[derive(Debug, thiserror::Error)]
pub enum TokenSecretError {
    /// No secret was configured.
    #[error("no token secret configured; set POSTBOARD_TOKEN_SECRET or POSTBOARD_TOKEN_SECRET_FILE")]
    Missing,
    /// Reading the secret file failed.
    #[error("failed to read token secret at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The secret is too short for release builds.
    #[error("token secret too short: need >= {min_len} bytes, got {length}")]
    TooShort { length: usize, min_len: usize },
    /// Release builds must not fall back to ephemeral secrets.
    #[error("ephemeral token secrets are not allowed in release builds")]
    EphemeralNotAllowed,
}

fn checked(bytes: Vec<u8>, mode: BuildMode) -> Result<TokenSecret, TokenSecretError> {
    let mut bytes = Zeroizing::new(bytes);
    let length = bytes.len();
    if length == 0 || (!mode.is_debug() && length < TOKEN_SECRET_MIN_LEN) {
        return Err(TokenSecretError::TooShort {
            length,
            min_len: TOKEN_SECRET_MIN_LEN,
        });
    }
    Ok(TokenSecret::configured(std::mem::take(&mut *bytes)))
}

/// Resolve the signing secret from `source`.
///
/// An inline value wins over a file. With neither configured, debug builds
/// generate an ephemeral secret and release builds fail.
///
/// # Examples
/// ```
/// use postboard::outbound::security::{BuildMode, TokenSecretSource, resolve_token_secret};
///
/// let source = TokenSecretSource {
///     value: Some("0123456789abcdef0123456789abcdef"),
///     ..TokenSecretSource::default()
/// };
/// let secret = resolve_token_secret(source, BuildMode::Release).unwrap();
/// assert!(!secret.is_ephemeral());
/// ```
///
/// # Errors
/// See [`TokenSecretError`].
pub fn resolve_token_secret(
    source: TokenSecretSource<'_>,
    mode: BuildMode,
) -> Result<TokenSecret, TokenSecretError> {
    if !mode.is_debug() && source.allow_ephemeral {
        return Err(TokenSecretError::EphemeralNotAllowed);
    }

    if let Some(value) = source.value {
        return checked(value.as_bytes().to_vec(), mode);
    }

    match source.file {
        Some(path) => match std::fs::read(path) {
            Ok(bytes) => checked(bytes, mode),
            Err(error) if source.allow_ephemeral => {
                warn!(
                    path = %path.display(),
                    error = %error,
                    "using ephemeral token secret (dev only)"
                );
                Ok(TokenSecret::generate())
            }
            Err(error) => Err(TokenSecretError::Read {
                path: path.to_path_buf(),
                source: error,
            }),
        },
        None if mode.is_debug() => {
            warn!("no token secret configured; using ephemeral secret (dev only)");
            Ok(TokenSecret::generate())
        }
        None => Err(TokenSecretError::Missing),
    }
}
