//! Password hashing for admin-managed credentials.
//!
//! Production: swap [`Sha256PasswordHasher`] for an argon2/bcrypt
//! implementation behind the same trait.

use rand::Rng;
use sha2::{Digest, Sha256};

/// Hashes and verifies raw passwords.
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, raw: &str) -> String;
    fn verify(&self, raw: &str, hashed: &str) -> bool;
}

/// Salted SHA-256 hasher producing `"<salt-hex>$<digest-hex>"`.
pub struct Sha256PasswordHasher;

impl Sha256PasswordHasher {
    pub fn new() -> Self {
        Self
    }

    fn digest(salt: &[u8], raw: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(salt);
        hasher.update(raw.as_bytes());
        hex::encode(hasher.finalize())
    }
}

impl Default for Sha256PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordHasher for Sha256PasswordHasher {
    fn hash(&self, raw: &str) -> String {
        let mut salt = [0u8; 16];
        rand::thread_rng().fill(&mut salt[..]);
        format!("{}${}", hex::encode(salt), Self::digest(&salt, raw))
    }

    fn verify(&self, raw: &str, hashed: &str) -> bool {
        let Some((salt_hex, digest_hex)) = hashed.split_once('$') else {
            return false;
        };
        let Ok(salt) = hex::decode(salt_hex) else {
            return false;
        };
        Self::digest(&salt, raw) == digest_hex
    }
}
