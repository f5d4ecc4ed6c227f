//! # Password hashing
//!
//! Identity passwords are stored as Argon2id hashes in PHC string format, e.g.
//!
//! ```text
//!   $argon2id$v=19$m=19456,t=2,p=1$<salt>$<hash>
//! ```
//!
//! The parameters are embedded in the string, so hashes produced with different parameters keep verifying if the
//! defaults change. Verification uses the constant-time comparison provided by `argon2`.
//!
//! Both functions are CPU-heavy. Async callers should run them on the blocking thread pool.

use std::sync::OnceLock;

use argon2::{
    password_hash::{rand_core::OsRng, SaltString},
    Argon2,
    PasswordHash,
    PasswordHasher,
    PasswordVerifier,
};
use log::warn;

use crate::api::errors::AuthApiError;

/// Hash a plaintext password with Argon2id and a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, AuthApiError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AuthApiError::PasswordHashError(e.to_string()))
}

/// Verify a plaintext password against a stored PHC hash.
///
/// Returns `Ok(true)` on a match and `Ok(false)` on a mismatch. A malformed stored hash is an error.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AuthApiError> {
    let parsed = PasswordHash::new(hash).map_err(|e| AuthApiError::PasswordHashError(format!("{e}")))?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(AuthApiError::PasswordHashError(e.to_string())),
    }
}

/// Burn roughly the same amount of time as a real verification. Used when a login names an unknown email so that
/// response times do not reveal which emails are registered.
pub fn dummy_verify(password: &str) {
    static DUMMY_HASH: OnceLock<Option<String>> = OnceLock::new();
    let hash = DUMMY_HASH.get_or_init(|| hash_password("not-a-real-password").ok());
    match hash {
        Some(h) => {
            let _ = verify_password(password, h);
        },
        None => warn!("🔐️ Could not create the dummy password hash. Timing of failed logins is not equalised."),
    }
}
