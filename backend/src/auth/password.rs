//! Password hashing
//!
//! Defines the [`PasswordHasher`] capability and its bcrypt and argon2
//! implementations.
//!
//! # Performance Considerations
//!
//! Both algorithms are intentionally CPU-intensive. Callers on the async
//! runtime should run them through `spawn_blocking`.

use crate::config::{HashAlgorithm, PasswordConfig};
use argon2::{
    password_hash::{
        rand_core::OsRng, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString,
    },
    Argon2,
};
use std::sync::Arc;
use thiserror::Error;

/// Password hashing failures
#[derive(Error, Debug)]
pub enum PasswordError {
    #[error("password does not match")]
    Mismatch,

    #[error("stored hash is malformed: {0}")]
    InvalidHash(String),

    #[error("failed to hash password: {0}")]
    Hashing(String),
}

/// One-way password hashing with comparison
pub trait PasswordHasher: Send + Sync {
    /// Hash a plaintext password with a fresh salt
    fn hash(&self, password: &str) -> Result<String, PasswordError>;

    /// Compare a plaintext password against a stored hash
    ///
    /// Returns `Err(PasswordError::Mismatch)` when the password is wrong.
    fn compare(&self, hash: &str, password: &str) -> Result<(), PasswordError>;
}

/// Build the hasher selected in configuration
pub fn hasher_from_config(config: &PasswordConfig) -> Arc<dyn PasswordHasher> {
    match config.algorithm {
        HashAlgorithm::Bcrypt => Arc::new(BcryptHasher::new(config.bcrypt_cost)),
        HashAlgorithm::Argon2 => Arc::new(Argon2Hasher),
    }
}

/// bcrypt with a fixed work factor
#[derive(Debug, Clone, Copy)]
pub struct BcryptHasher {
    cost: u32,
}

impl BcryptHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }
}

impl Default for BcryptHasher {
    fn default() -> Self {
        Self::new(bcrypt::DEFAULT_COST)
    }
}

impl PasswordHasher for BcryptHasher {
    fn hash(&self, password: &str) -> Result<String, PasswordError> {
        bcrypt::hash(password, self.cost).map_err(|e| PasswordError::Hashing(e.to_string()))
    }

    fn compare(&self, hash: &str, password: &str) -> Result<(), PasswordError> {
        // bcrypt::verify compares digests in constant time.
        match bcrypt::verify(password, hash) {
            Ok(true) => Ok(()),
            Ok(false) => Err(PasswordError::Mismatch),
            Err(e) => Err(PasswordError::InvalidHash(e.to_string())),
        }
    }
}

/// Argon2id with the crate's default parameters
#[derive(Debug, Clone, Copy, Default)]
pub struct Argon2Hasher;

impl PasswordHasher for Argon2Hasher {
    fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| PasswordError::Hashing(e.to_string()))?;
        Ok(hash.to_string())
    }

    fn compare(&self, hash: &str, password: &str) -> Result<(), PasswordError> {
        let parsed_hash =
            PasswordHash::new(hash).map_err(|e| PasswordError::InvalidHash(e.to_string()))?;
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .map_err(|_| PasswordError::Mismatch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Minimum bcrypt cost keeps the suite fast.
    fn bcrypt() -> BcryptHasher {
        BcryptHasher::new(4)
    }

    #[test]
    fn test_bcrypt_hash_and_compare() {
        let hasher = bcrypt();
        let hash = hasher.hash("secure_password_123").unwrap();

        assert!(hasher.compare(&hash, "secure_password_123").is_ok());
        assert!(matches!(
            hasher.compare(&hash, "wrong_password"),
            Err(PasswordError::Mismatch)
        ));
    }

    #[test]
    fn test_bcrypt_never_stores_plaintext() {
        let hash = bcrypt().hash("plaintext").unwrap();
        assert!(!hash.contains("plaintext"));
        assert!(hash.starts_with("$2"));
    }

    #[test]
    fn test_bcrypt_invalid_cost_fails() {
        let hasher = BcryptHasher::new(1);
        assert!(matches!(hasher.hash("pw"), Err(PasswordError::Hashing(_))));
    }

    #[test]
    fn test_bcrypt_malformed_hash() {
        assert!(matches!(
            bcrypt().compare("not-a-hash", "pw"),
            Err(PasswordError::InvalidHash(_))
        ));
    }

    #[test]
    fn test_argon2_hash_and_compare() {
        let hasher = Argon2Hasher;
        let hash = hasher.hash("test_password").unwrap();

        assert!(hasher.compare(&hash, "test_password").is_ok());
        assert!(matches!(
            hasher.compare(&hash, "wrong"),
            Err(PasswordError::Mismatch)
        ));
    }

    #[test]
    fn test_different_hashes_for_same_password() {
        let hasher = Argon2Hasher;
        let hash1 = hasher.hash("test_password").unwrap();
        let hash2 = hasher.hash("test_password").unwrap();

        // Hashes should be different due to random salt
        assert_ne!(hash1, hash2);
        assert!(hasher.compare(&hash1, "test_password").is_ok());
        assert!(hasher.compare(&hash2, "test_password").is_ok());
    }

    #[test]
    fn test_hasher_from_config() {
        let config = PasswordConfig {
            algorithm: HashAlgorithm::Argon2,
            bcrypt_cost: 4,
        };
        let hasher = hasher_from_config(&config);
        let hash = hasher.hash("pw").unwrap();
        assert!(hash.starts_with("$argon2"));
    }
}
