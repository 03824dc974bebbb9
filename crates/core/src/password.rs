//! Credential hashing and verification.
//!
//! Passwords are hashed with Argon2id using a random per-hash salt and
//! stored as PHC strings. Hashing is deliberately expensive; callers
//! should never invoke it on a hot path other than registration/login.

use crate::error::Error;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

/// Hash a password for storage.
///
/// The output format embeds the algorithm, parameters, and salt, so
/// verification needs no out-of-band state. Two hashes of the same
/// password differ (fresh salt each time).
pub fn hash_password(password: &str) -> Result<String, Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| Error::PasswordHash(e.to_string()))?;
    Ok(hash.to_string())
}

/// Verify a password against a stored hash.
///
/// Returns false for a wrong password and for a malformed stored hash;
/// this function never errors. The underlying comparison is constant
/// time relative to the stored hash's parameters.
pub fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_not_the_password() {
        let hash = hash_password("password123").unwrap();
        assert_ne!(hash, "password123");
        assert!(hash.starts_with("$argon2"));
    }

    #[test]
    fn verify_accepts_correct_password() {
        let hash = hash_password("password123").unwrap();
        assert!(verify_password("password123", &hash));
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let hash = hash_password("password123").unwrap();
        assert!(!verify_password("password124", &hash));
        assert!(!verify_password("", &hash));
    }

    #[test]
    fn verify_rejects_malformed_hash_without_panicking() {
        assert!(!verify_password("password123", ""));
        assert!(!verify_password("password123", "not-a-phc-string"));
        assert!(!verify_password("password123", "$argon2id$garbage"));
    }

    #[test]
    fn hashes_are_salted() {
        let a = hash_password("password123").unwrap();
        let b = hash_password("password123").unwrap();
        assert_ne!(a, b);
        assert!(verify_password("password123", &a));
        assert!(verify_password("password123", &b));
    }
}
