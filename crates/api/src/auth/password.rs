//! # Password hashing and verification (Argon2id)
//!
//! [`hash_password`] salts with [`OsRng`] and returns a PHC-format string
//! (`$argon2id$v=19$m=19456,t=2,p=1$...`), which is what the `users`
//! table stores. [`verify_password`] parses such a string and reports
//! whether the plaintext matches: `Ok(false)` on mismatch, `Err` when the
//! stored hash is malformed.
//!
//! Hashing is deliberately expensive, so request handlers call the
//! `_blocking` variants, which move the work onto tokio's blocking pool.
//! A login for an unknown username still pays for one verification, against
//! a hash generated once per process, so response times do not reveal which
//! usernames exist.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use std::sync::OnceLock;

use crate::error::AppError;

static UNKNOWN_USER_HASH: OnceLock<String> = OnceLock::new();

fn unknown_user_hash() -> Result<&'static str, AppError> {
    if let Some(hash) = UNKNOWN_USER_HASH.get() {
        return Ok(hash);
    }
    let hash = hash_password(&uuid::Uuid::new_v4().to_string())?;
    Ok(UNKNOWN_USER_HASH.get_or_init(|| hash))
}

/// Hash a password using Argon2id. Returns a PHC-format string.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::PasswordHash(e.to_string()))?;
    Ok(hash.to_string())
}

/// Verify a password against a PHC-format hash string.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    let parsed = PasswordHash::new(hash).map_err(|e| AppError::PasswordHash(e.to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

pub async fn hash_password_blocking(password: String) -> Result<String, AppError> {
    tokio::task::spawn_blocking(move || hash_password(&password)).await?
}

pub async fn verify_password_blocking(password: String, hash: String) -> Result<bool, AppError> {
    tokio::task::spawn_blocking(move || verify_password(&password, &hash)).await?
}

/// Does the same work as [`verify_password_blocking`] for a username with no
/// account. Always `Ok(false)`.
pub async fn verify_unknown_user_blocking(password: String) -> Result<bool, AppError> {
    tokio::task::spawn_blocking(move || {
        verify_password(&password, unknown_user_hash()?)?;
        Ok(false)
    })
    .await?
}
