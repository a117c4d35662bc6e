//! Password hashing, session token signing and token secret loading.

mod bcrypt_hasher;
mod jwt_codec;
mod token_secret;

pub use bcrypt_hasher::BcryptPasswordHasher;
pub use jwt_codec::JwtTokenCodec;
pub use token_secret::{
    BuildMode, TOKEN_SECRET_MIN_LEN, TokenSecret, TokenSecretError, TokenSecretSource,
    resolve_token_secret,
};
