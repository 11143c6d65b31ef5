//! Password hashing with Argon2id

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};

use crate::error::AuthError;

/// Salted, work-factor-tunable password hasher
///
/// Produces PHC strings (`$argon2id$v=19$m=..,t=..,p=..$salt$hash`), so the
/// parameters used for a stored hash travel with it and verification keeps
/// working after the configured work factor changes.
#[derive(Clone, Debug, Default)]
pub struct PasswordHasher {
    params: Params,
}

impl PasswordHasher {
    /// Create a hasher with explicit Argon2 costs
    pub fn new(memory_kib: u32, iterations: u32, parallelism: u32) -> Result<Self, AuthError> {
        let params = Params::new(memory_kib, iterations, parallelism, None)
            .map_err(|e| AuthError::PasswordHash(e.to_string()))?;
        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hash a password with a fresh random salt
    pub fn hash(&self, plaintext: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2()
            .hash_password(plaintext.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AuthError::PasswordHash(e.to_string()))
    }

    /// Verify a password against a stored hash
    ///
    /// Returns `Ok(false)` on mismatch; only a malformed stored hash is an error.
    pub fn verify(&self, plaintext: &str, stored_hash: &str) -> Result<bool, AuthError> {
        let parsed = PasswordHash::new(stored_hash)
            .map_err(|e| AuthError::CorruptCredential(e.to_string()))?;

        match self.argon2().verify_password(plaintext.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(AuthError::CorruptCredential(e.to_string())),
        }
    }

    /// [`hash`](Self::hash) on the blocking thread pool
    pub async fn hash_async(&self, plaintext: String) -> Result<String, AuthError> {
        let hasher = self.clone();
        tokio::task::spawn_blocking(move || hasher.hash(&plaintext))
            .await
            .map_err(|e| AuthError::Internal(format!("hashing task failed: {}", e)))?
    }

    /// [`verify`](Self::verify) on the blocking thread pool
    pub async fn verify_async(
        &self,
        plaintext: String,
        stored_hash: String,
    ) -> Result<bool, AuthError> {
        let hasher = self.clone();
        tokio::task::spawn_blocking(move || hasher.verify(&plaintext, &stored_hash))
            .await
            .map_err(|e| AuthError::Internal(format!("verification task failed: {}", e)))?
    }
}
