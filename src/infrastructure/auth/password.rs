//! Password Hasher backed by Argon2id

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{
    PasswordHash, PasswordHasher as _, PasswordVerifier as _, SaltString,
};
use argon2::{Algorithm, Argon2, Params, Version};

use crate::domain::DomainError;

/// One-way password hashing
pub trait PasswordHasher: Send + Sync {
    /// Produce a PHC string (`$argon2id$...`) with a fresh random salt
    fn hash(&self, password: &str) -> Result<String, DomainError>;

    /// Constant-time check of `password` against a stored PHC string.
    /// A hash that does not parse never matches.
    fn verify(&self, password: &str, hash: &str) -> bool;
}

/// Argon2id with the argon2 crate's default cost parameters
#[derive(Debug, Clone, Default)]
pub struct Argon2Hasher {
    params: Params,
}

impl Argon2Hasher {
    pub fn new() -> Self {
        Self::default()
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }
}

impl PasswordHasher for Argon2Hasher {
    fn hash(&self, password: &str) -> Result<String, DomainError> {
        let salt = SaltString::generate(&mut OsRng);

        let phc = self
            .argon2()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| DomainError::crypto_failure(format!("argon2 hash failed: {}", e)))?;

        Ok(phc.to_string())
    }

    fn verify(&self, password: &str, hash: &str) -> bool {
        let Ok(stored) = PasswordHash::new(hash) else {
            tracing::warn!("Stored password hash is not a valid PHC string");
            return false;
        };

        self.argon2()
            .verify_password(password.as_bytes(), &stored)
            .is_ok()
    }
}
