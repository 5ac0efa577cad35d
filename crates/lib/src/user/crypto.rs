//! Password hashing for the account system
//!
//! Digests are Argon2id PHC strings with a random per-password salt, so the
//! salt and parameters travel inside the stored digest.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use rand::rngs::OsRng;

use super::errors::UserError;
use crate::Result;

/// Hash a password using Argon2id
///
/// # Returns
/// The Argon2 hash string (PHC format)
pub fn hash_password(password: impl AsRef<str>) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    let password_hash = Argon2::default()
        .hash_password(password.as_ref().as_bytes(), &salt)
        .map_err(|e| UserError::HashingFailed {
            reason: e.to_string(),
        })?
        .to_string();

    Ok(password_hash)
}

/// Verify a password against its stored digest
///
/// Returns `false` both for a wrong password and for a digest that cannot be
/// parsed; callers treat either as a failed login.
pub fn verify_password(password: impl AsRef<str>, password_hash: impl AsRef<str>) -> bool {
    let Ok(parsed_hash) = PasswordHash::new(password_hash.as_ref()) else {
        return false;
    };

    Argon2::default()
        .verify_password(password.as_ref().as_bytes(), &parsed_hash)
        .is_ok()
}
