//! Port for password hashing and verification.

use sha2::{Digest, Sha256};

/// Port abstracting the password hashing scheme.
///
/// Hashing is CPU-bound and synchronous; callers run on worker threads.
#[cfg_attr(test, mockall::automock)]
pub trait PasswordHasher: Send + Sync {
    /// Hash a plaintext password for storage.
    fn hash(&self, password: &str) -> String;

    /// Check a plaintext password against a stored hash.
    fn verify(&self, password: &str, hash: &str) -> bool;
}

/// Salted SHA-256 password hashing.
///
/// The salt is generated per hash and stored alongside the digest as
/// `{salt_hex}${digest_hex}`.
#[derive(Debug, Default, Clone, Copy)]
pub struct Sha256PasswordHasher;

impl Sha256PasswordHasher {
    fn digest(salt: &str, password: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(salt.as_bytes());
        hasher.update(password.as_bytes());
        hex::encode(hasher.finalize())
    }
}

impl PasswordHasher for Sha256PasswordHasher {
    fn hash(&self, password: &str) -> String {
        let salt = hex::encode(uuid::Uuid::new_v4().as_bytes());
        let digest = Self::digest(&salt, password);
        format!("{salt}${digest}")
    }

    fn verify(&self, password: &str, hash: &str) -> bool {
        let Some((salt, digest)) = hash.split_once('$') else {
            return false;
        };
        Self::digest(salt, password) == digest
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_round_trips() {
        let hasher = Sha256PasswordHasher;
        let stored = hasher.hash("hunter2");
        assert!(hasher.verify("hunter2", &stored));
        assert!(!hasher.verify("hunter3", &stored));
    }

    #[test]
    fn hashes_are_salted() {
        let hasher = Sha256PasswordHasher;
        assert_ne!(hasher.hash("hunter2"), hasher.hash("hunter2"));
    }

    #[test]
    fn malformed_hash_never_verifies() {
        let hasher = Sha256PasswordHasher;
        assert!(!hasher.verify("hunter2", "no-separator"));
    }
}
