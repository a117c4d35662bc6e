//! HS256 JSON Web Token codec.

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use tracing::debug;

use crate::domain::ports::{SessionClaims, TokenCodec, TokenCodecError};

/// [`TokenCodec`] signing [`SessionClaims`] as HS256 JWTs.
///
/// The library's own `exp` check is disabled; the credential service judges
/// expiry against its clock so tests can move time.
#[derive(Clone)]
pub struct JwtTokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl JwtTokenCodec {
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
        }
    }
}

impl TokenCodec for JwtTokenCodec {
    fn sign(&self, claims: &SessionClaims) -> Result<String, TokenCodecError> {
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
            .map_err(|err| TokenCodecError::signing(err.to_string()))
    }

    fn decode(&self, token: &str) -> Option<SessionClaims> {
        match jsonwebtoken::decode::<SessionClaims>(token, &self.decoding, &self.validation) {
            Ok(data) => Some(data.claims),
            Err(err) => {
                debug!(error = %err, "rejected session token");
                None
            }
        }
    }
}
