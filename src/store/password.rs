//! Argon2id password hashing.
//!
//! Hashing is deliberately slow, so the async helpers move the work onto the
//! blocking thread pool instead of stalling the request executor.

use super::StoreError;
use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use std::sync::OnceLock;

static DUMMY_HASH: OnceLock<String> = OnceLock::new();

/// Hash `password` into a PHC string (`$argon2id$v=19$...`).
///
/// # Errors
///
/// Returns [`StoreError::PasswordHash`] if hashing fails.
pub fn hash_password(password: &str) -> Result<String, StoreError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| StoreError::PasswordHash(e.to_string()))
}

/// Check `password` against a PHC string produced by [`hash_password`].
///
/// # Errors
///
/// Returns [`StoreError::PasswordHash`] if `hash` cannot be parsed.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, StoreError> {
    let parsed = PasswordHash::new(hash).map_err(|e| StoreError::PasswordHash(e.to_string()))?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(StoreError::PasswordHash(e.to_string())),
    }
}

pub(crate) async fn hash_blocking(password: String) -> Result<String, StoreError> {
    tokio::task::spawn_blocking(move || hash_password(&password)).await?
}

pub(crate) async fn verify_blocking(password: String, hash: String) -> Result<bool, StoreError> {
    tokio::task::spawn_blocking(move || verify_password(&password, &hash)).await?
}

/// Burn the same CPU as a real verification for users that do not exist, so
/// response timing does not reveal which usernames are registered.
pub(crate) async fn verify_dummy(password: String) -> Result<(), StoreError> {
    tokio::task::spawn_blocking(move || {
        let hash = DUMMY_HASH.get_or_init(|| hash_password("tokengate-dummy").unwrap_or_default());
        let _ = verify_password(&password, hash);
    })
    .await?;
    Ok(())
}
