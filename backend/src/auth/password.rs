//! Password hashing using argon2
//!
//! Argon2 is intentionally CPU-intensive, so request handlers go through
//! the `*_async` variants which run on tokio's blocking pool.

use anyhow::Result;
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use once_cell::sync::Lazy;

/// Hash checked when the username is unknown, so a miss costs as much as
/// a wrong password.
static DUMMY_HASH: Lazy<Option<String>> =
    Lazy::new(|| PasswordService::hash("agrifinance-timing-equalizer").ok());

/// Password hashing service (Argon2id)
pub struct PasswordService;

impl PasswordService {
    /// Hash a password into a PHC string (blocking operation)
    pub fn hash(password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        let hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?;
        Ok(hash.to_string())
    }

    /// Hash a password on the blocking thread pool
    pub async fn hash_async(password: String) -> Result<String> {
        tokio::task::spawn_blocking(move || Self::hash(&password))
            .await
            .map_err(|e| anyhow::anyhow!("Task join error: {}", e))?
    }

    /// Verify a password against a hash (blocking operation)
    pub fn verify(password: &str, hash: &str) -> Result<bool> {
        let parsed_hash =
            PasswordHash::new(hash).map_err(|e| anyhow::anyhow!("Invalid hash format: {}", e))?;
        let argon2 = Argon2::default();
        Ok(argon2
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Verify a password on the blocking thread pool
    pub async fn verify_async(password: String, hash: String) -> Result<bool> {
        tokio::task::spawn_blocking(move || Self::verify(&password, &hash))
            .await
            .map_err(|e| anyhow::anyhow!("Task join error: {}", e))?
    }

    /// Burn one verification for a user that does not exist. Always false.
    pub async fn verify_dummy_async(password: String) -> Result<bool> {
        tokio::task::spawn_blocking(move || {
            if let Some(hash) = DUMMY_HASH.as_deref() {
                let _ = Self::verify(&password, hash);
            }
            false
        })
        .await
        .map_err(|e| anyhow::anyhow!("Task join error: {}", e))
    }
}
