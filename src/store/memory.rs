use super::{
    CredentialStore, Identity, NewUser, StoreError, normalize_username,
    password::{hash_blocking, verify_blocking, verify_dummy},
};
use async_trait::async_trait;
use secrecy::ExposeSecret;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Debug, Clone)]
struct Record {
    identity: Identity,
    password_hash: String,
}

/// Process-local store used when no database is configured.
///
/// Contents are lost on restart.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    // keyed by normalized username
    users: RwLock<HashMap<String, Record>>,
}

impl MemoryCredentialStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a user with the given roles, bypassing registration.
    ///
    /// Registration never grants roles, so this is how privileged accounts get
    /// seeded.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Conflict`] if the username exists, or
    /// [`StoreError::PasswordHash`] if hashing fails.
    pub async fn with_roles<I, S>(&self, user: NewUser, roles: I) -> Result<Identity, StoreError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut identity = self.create(user).await?;
        identity.roles = roles.into_iter().map(Into::into).collect();

        let mut users = self.users.write().await;
        if let Some(record) = users.get_mut(&normalize_username(&identity.username)) {
            record.identity.roles.clone_from(&identity.roles);
        }
        Ok(identity)
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn find_by_name(&self, username: &str) -> Result<Option<Identity>, StoreError> {
        let users = self.users.read().await;
        Ok(users.get(&normalize_username(username)).map(|record| record.identity.clone()))
    }

    async fn verify(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<Identity>, StoreError> {
        let record = self
            .users
            .read()
            .await
            .get(&normalize_username(username))
            .cloned();

        let Some(record) = record else {
            debug!("unknown user");
            verify_dummy(password.to_string()).await?;
            return Ok(None);
        };

        if verify_blocking(password.to_string(), record.password_hash).await? {
            Ok(Some(record.identity))
        } else {
            Ok(None)
        }
    }

    async fn create(&self, user: NewUser) -> Result<Identity, StoreError> {
        let key = normalize_username(&user.username);
        if self.users.read().await.contains_key(&key) {
            return Err(StoreError::Conflict(user.username));
        }

        let password_hash = hash_blocking(user.password.expose_secret().to_string()).await?;
        let identity = Identity {
            username: user.username,
            email: user.email,
            roles: Vec::new(),
        };

        // Re-check under the write lock; another request may have won the race
        // while we were hashing.
        let mut users = self.users.write().await;
        if users.contains_key(&key) {
            return Err(StoreError::Conflict(identity.username));
        }
        users.insert(
            key,
            Record {
                identity: identity.clone(),
                password_hash,
            },
        );
        Ok(identity)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::SecretString;

    fn new_user(name: &str, password: &str) -> NewUser {
        NewUser {
            username: name.to_string(),
            email: format!("{name}@example.com"),
            password: SecretString::from(password.to_string()),
        }
    }

    #[tokio::test]
    async fn create_then_verify() -> Result<(), StoreError> {
        let store = MemoryCredentialStore::new();
        let created = store.create(new_user("alice", "pw-alice")).await?;
        assert_eq!(created.username, "alice");
        assert!(created.roles.is_empty());

        let verified = store.verify("alice", "pw-alice").await?;
        assert_eq!(verified, Some(created));
        Ok(())
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_user_look_the_same() -> Result<(), StoreError> {
        let store = MemoryCredentialStore::new();
        store.create(new_user("alice", "pw-alice")).await?;

        assert_eq!(store.verify("alice", "nope").await?, None);
        assert_eq!(store.verify("mallory", "pw-alice").await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn duplicate_username_conflicts() -> Result<(), StoreError> {
        let store = MemoryCredentialStore::new();
        store.create(new_user("alice", "one")).await?;

        let result = store.create(new_user("alice", "two")).await;
        assert!(matches!(result, Err(StoreError::Conflict(name)) if name == "alice"));

        // The first password still works.
        assert!(store.verify("alice", "one").await?.is_some());
        Ok(())
    }

    #[tokio::test]
    async fn seeded_roles_are_returned() -> Result<(), StoreError> {
        let store = MemoryCredentialStore::new();
        store
            .with_roles(new_user("root", "pw-root"), ["Admin", "Reader"])
            .await?;

        let found = store.find_by_name("root").await?;
        assert_eq!(
            found.map(|identity| identity.roles),
            Some(vec!["Admin".to_string(), "Reader".to_string()])
        );

        let verified = store.verify("root", "pw-root").await?;
        assert!(verified.is_some_and(|identity| identity.roles.len() == 2));
        Ok(())
    }

    #[tokio::test]
    async fn usernames_ignore_case() -> Result<(), StoreError> {
        let store = MemoryCredentialStore::new();
        store.create(new_user("Alice", "pw-alice")).await?;

        let found = store.find_by_name("ALICE").await?;
        assert_eq!(found.map(|identity| identity.username), Some("Alice".to_string()));
        assert!(store.verify("alice", "pw-alice").await?.is_some());

        let result = store.create(new_user("alice", "other")).await;
        assert!(matches!(result, Err(StoreError::Conflict(name)) if name == "alice"));
        store.ping().await
    }
}
