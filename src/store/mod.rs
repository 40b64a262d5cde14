//! Credential storage.
//!
//! The token core never touches user records directly; it goes through
//! [`CredentialStore`], which only ever hands out non-sensitive identity fields.
//! Password hashes stay inside the store implementations.
//!
//! Usernames are matched case-insensitively through [`normalize_username`];
//! the casing given at registration is what gets returned.

mod memory;
mod password;
mod postgres;

pub use self::memory::MemoryCredentialStore;
pub use self::password::{hash_password, verify_password};
pub use self::postgres::PgCredentialStore;

use async_trait::async_trait;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use utoipa::ToSchema;

/// Public view of a stored user.
#[derive(ToSchema, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub username: String,
    pub email: String,
    pub roles: Vec<String>,
}

#[derive(Debug)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: SecretString,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("user already exists: {0}")]
    Conflict(String),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("password hashing failed: {0}")]
    PasswordHash(String),
    #[error("background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Lookup key for a username: trimmed and lowercased.
#[must_use]
pub fn normalize_username(username: &str) -> String {
    username.trim().to_lowercase()
}

/// Store handle shared by the request handlers.
pub type SharedStore = Arc<dyn CredentialStore>;

#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Look up a user by username, ignoring case.
    async fn find_by_name(&self, username: &str) -> Result<Option<Identity>, StoreError>;

    /// Check `password` for `username`.
    ///
    /// Returns `None` both for an unknown user and for a wrong password.
    async fn verify(&self, username: &str, password: &str)
    -> Result<Option<Identity>, StoreError>;

    /// Create a user with no roles.
    ///
    /// Fails with [`StoreError::Conflict`] if the username is taken in any
    /// casing.
    async fn create(&self, user: NewUser) -> Result<Identity, StoreError>;

    async fn ping(&self) -> Result<(), StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_username_folds_case_and_trims() {
        assert_eq!(normalize_username(" Alice "), "alice");
        assert_eq!(normalize_username("ALICE"), normalize_username("alice"));
        assert_eq!(normalize_username("Zoë"), "zoë");
    }
}
