//! Password hashing - one-way salted hash and verification.
//!
//! DDD: The hasher is a domain port; `Argon2Hasher` is the production adapter.
//! Cost parameters are fixed at construction and never touched by the
//! orchestration logic.

use argon2::{
    password_hash::{
        rand_core::OsRng, PasswordHash as PhcString, PasswordHasher as _, PasswordVerifier,
        SaltString,
    },
    Algorithm, Argon2, Params, Version,
};

use crate::error::{DomainError, DomainResult};
use crate::values::{Password, PasswordHash};

/// Hash + verify abstraction used by the user service.
pub trait PasswordHasher: Send + Sync {
    /// Hash the plaintext with a fresh salt.
    fn hash(&self, plain: &Password) -> DomainResult<PasswordHash>;

    /// Check a plaintext candidate against a stored hash.
    ///
    /// Returns `false` for a mismatch and for malformed or foreign hashes.
    fn verify(&self, hash: &PasswordHash, candidate: &str) -> bool;
}

/// Argon2id hasher with configurable cost.
#[derive(Clone)]
pub struct Argon2Hasher {
    argon2: Argon2<'static>,
}

impl std::fmt::Debug for Argon2Hasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Argon2Hasher").finish_non_exhaustive()
    }
}

impl Argon2Hasher {
    /// Build a hasher from explicit cost parameters.
    ///
    /// # Errors
    /// Returns `HashingFailure` if the parameters are outside Argon2's limits.
    pub fn new(time_cost: u32, memory_kib: u32, parallelism: u32) -> DomainResult<Self> {
        let params = Params::new(memory_kib, time_cost, parallelism, None)
            .map_err(|e| DomainError::hashing(format!("invalid hasher parameters: {}", e)))?;

        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }
}

impl PasswordHasher for Argon2Hasher {
    fn hash(&self, plain: &Password) -> DomainResult<PasswordHash> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2
            .hash_password(plain.as_str().as_bytes(), &salt)
            .map_err(|e| DomainError::hashing(e.to_string()))?;
        Ok(PasswordHash::from_hash(hash.to_string()))
    }

    fn verify(&self, hash: &PasswordHash, candidate: &str) -> bool {
        let Ok(parsed) = PhcString::new(hash.as_str()) else {
            return false;
        };
        self.argon2
            .verify_password(candidate.as_bytes(), &parsed)
            .is_ok()
    }
}
