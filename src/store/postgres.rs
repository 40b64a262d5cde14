use super::{
    CredentialStore, Identity, NewUser, StoreError, normalize_username,
    password::{hash_blocking, verify_blocking, verify_dummy},
};
use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::{PgPool, Row, postgres::PgPoolOptions};
use std::time::Duration;
use tracing::{debug, instrument};

/// `PostgreSQL`-backed store, schema in `db/sql/schema.sql`.
#[derive(Debug, Clone)]
pub struct PgCredentialStore {
    pool: PgPool,
}

impl PgCredentialStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a pool against `dsn` and check that it answers.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`] if the connection fails.
    pub async fn connect(dsn: &str) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .min_connections(1)
            .max_connections(5)
            .max_lifetime(Duration::from_secs(60 * 2))
            .test_before_acquire(true)
            .connect(dsn)
            .await?;

        Ok(Self::new(pool))
    }

    async fn roles(&self, username: &str) -> Result<Vec<String>, StoreError> {
        let rows = sqlx::query(
            "SELECT role FROM user_roles WHERE username = $1 ORDER BY position, role",
        )
        .bind(username)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| row.try_get::<String, _>("role").map_err(StoreError::from))
            .collect()
    }
}

pub(super) fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().is_some_and(|code| code.as_ref() == "23505"),
        _ => false,
    }
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    #[instrument(skip(self))]
    async fn find_by_name(&self, username: &str) -> Result<Option<Identity>, StoreError> {
        let row = sqlx::query("SELECT username, email FROM users WHERE username_normalized = $1")
            .bind(normalize_username(username))
            .fetch_optional(&self.pool)
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let username: String = row.try_get("username")?;
        Ok(Some(Identity {
            roles: self.roles(&username).await?,
            email: row.try_get("email")?,
            username,
        }))
    }

    #[instrument(skip(self, password))]
    async fn verify(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<Identity>, StoreError> {
        let row = sqlx::query(
            "SELECT username, email, password_hash FROM users WHERE username_normalized = $1",
        )
        .bind(normalize_username(username))
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            debug!("unknown user");
            verify_dummy(password.to_string()).await?;
            return Ok(None);
        };

        let password_hash: String = row.try_get("password_hash")?;
        if !verify_blocking(password.to_string(), password_hash).await? {
            return Ok(None);
        }

        let username: String = row.try_get("username")?;
        Ok(Some(Identity {
            roles: self.roles(&username).await?,
            email: row.try_get("email")?,
            username,
        }))
    }

    #[instrument(skip(self, user), fields(username = %user.username))]
    async fn create(&self, user: NewUser) -> Result<Identity, StoreError> {
        let password_hash = hash_blocking(user.password.expose_secret().to_string()).await?;

        let result = sqlx::query(
            r"
            INSERT INTO users (username, username_normalized, email, password_hash)
            VALUES ($1, $2, $3, $4)
            ",
        )
        .bind(&user.username)
        .bind(normalize_username(&user.username))
        .bind(&user.email)
        .bind(&password_hash)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(Identity {
                username: user.username,
                email: user.email,
                roles: Vec::new(),
            }),
            Err(err) if is_unique_violation(&err) => Err(StoreError::Conflict(user.username)),
            Err(err) => Err(err.into()),
        }
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
