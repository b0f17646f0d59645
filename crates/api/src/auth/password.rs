//! Argon2id password hashing, verification, and signup password rules.
//!
//! All password hashes use the Argon2id variant with a random salt generated
//! via [`OsRng`]. The PHC string format is used for storage so the algorithm
//! parameters and salt travel with the hash.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use yanote_core::error::FieldErrors;

/// Field that carries password rule violations on the signup form.
const PASSWORD_FIELD: &str = "password2";

/// Hash a plaintext password using Argon2id with a random salt.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Verify a plaintext password against a stored PHC-formatted hash.
///
/// Returns `Ok(false)` on mismatch; `Err` only for a malformed hash.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, argon2::password_hash::Error> {
    let parsed_hash = PasswordHash::new(hash)?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(e),
    }
}

/// Check a new password against the signup rules.
///
/// The password must have at least `min_length` characters, must not be
/// entirely numeric, and must differ from the username. Every violated rule
/// is reported.
pub fn validate_password_strength(password: &str, username: &str, min_length: usize) -> FieldErrors {
    let mut errors = FieldErrors::new();
    if password.chars().count() < min_length {
        errors.add(
            PASSWORD_FIELD,
            format!(
                "This password is too short. It must contain at least {min_length} characters."
            ),
        );
    }
    if !password.is_empty() && password.chars().all(|c| c.is_ascii_digit()) {
        errors.add(PASSWORD_FIELD, "This password is entirely numeric.");
    }
    if !username.is_empty() && password.to_lowercase() == username.to_lowercase() {
        errors.add(PASSWORD_FIELD, "The password is too similar to the username.");
    }
    errors
}
