//! bcrypt-backed [`PasswordHasher`].
//!
//! bcrypt is CPU-bound, so both hashing and verification run on the
//! blocking thread pool.

use async_trait::async_trait;
use zeroize::Zeroizing;

use crate::domain::PasswordHash;
use crate::domain::ports::{PasswordHashError, PasswordHasher};

/// Password hasher using bcrypt with a configurable work factor.
#[derive(Debug, Clone, Copy)]
pub struct BcryptPasswordHasher {
    cost: u32,
}

impl BcryptPasswordHasher {
    /// Hasher with an explicit bcrypt cost (4..=31).
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }
}

impl Default for BcryptPasswordHasher {
    fn default() -> Self {
        Self::new(bcrypt::DEFAULT_COST)
    }
}

fn hashing_error(error: impl std::fmt::Display) -> PasswordHashError {
    PasswordHashError::hashing(error.to_string())
}

#[async_trait]
impl PasswordHasher for BcryptPasswordHasher {
    async fn hash(&self, password: &str) -> Result<PasswordHash, PasswordHashError> {
        let password = Zeroizing::new(password.to_owned());
        let cost = self.cost;
        let hashed = tokio::task::spawn_blocking(move || bcrypt::hash(password.as_str(), cost))
            .await
            .map_err(hashing_error)?
            .map_err(hashing_error)?;
        Ok(PasswordHash::new(hashed))
    }

    async fn verify(
        &self,
        password: &str,
        hash: &PasswordHash,
    ) -> Result<bool, PasswordHashError> {
        let password = Zeroizing::new(password.to_owned());
        let hash = hash.as_str().to_owned();
        tokio::task::spawn_blocking(move || bcrypt::verify(password.as_str(), &hash))
            .await
            .map_err(hashing_error)?
            .map_err(hashing_error)
    }
}

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};

    use super::*;

    #[fixture]
    fn hasher() -> BcryptPasswordHasher {
        BcryptPasswordHasher::new(4)
    }

    #[rstest]
    #[tokio::test]
    async fn hash_verifies_only_the_original_password(hasher: BcryptPasswordHasher) {
        let hash = hasher.hash("s3cret-pass").await.expect("hash");

        assert_ne!(hash.as_str(), "s3cret-pass");
        assert!(hasher.verify("s3cret-pass", &hash).await.expect("verify"));
        assert!(!hasher.verify("wrong-pass", &hash).await.expect("verify"));
    }

    #[rstest]
    #[tokio::test]
    async fn malformed_hash_is_an_error(hasher: BcryptPasswordHasher) {
        let result = hasher
            .verify("s3cret-pass", &PasswordHash::new("not-a-bcrypt-hash"))
            .await;
        assert!(result.is_err());
    }

    #[rstest]
    #[tokio::test]
    async fn out_of_range_cost_is_an_error() {
        let result = BcryptPasswordHasher::new(2).hash("s3cret-pass").await;
        assert!(result.is_err());
    }

    #[rstest]
    fn default_cost_matches_bcrypt_default() {
        assert_eq!(BcryptPasswordHasher::default().cost(), bcrypt::DEFAULT_COST);
    }
}
