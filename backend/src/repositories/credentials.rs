//! Credential store for username/password-hash pairs

use async_trait::async_trait;
use sqlx::SqlitePool;
use thiserror::Error;

/// Credential store failures
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("username already exists")]
    Duplicate,

    #[error("credential store error: {0}")]
    Backend(#[from] anyhow::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => StoreError::Duplicate,
            _ => StoreError::Backend(err.into()),
        }
    }
}

/// Persists username → password hash pairs
///
/// Plaintext passwords never reach this layer. Implementations must be
/// safe to share across request handlers.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Fetch the stored hash for `username`, if the user exists
    async fn get_by_username(&self, username: &str) -> Result<Option<String>, StoreError>;

    /// Create a credential atomically
    ///
    /// Returns [`StoreError::Duplicate`] when the username is taken; no
    /// partial record is left behind on any failure.
    async fn create(&self, username: &str, password_hash: &str) -> Result<(), StoreError>;

    /// Check that the backing store is reachable
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// SQLite-backed credential store
#[derive(Clone)]
pub struct SqliteCredentialStore {
    pool: SqlitePool,
}

impl SqliteCredentialStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CredentialStore for SqliteCredentialStore {
    async fn get_by_username(&self, username: &str) -> Result<Option<String>, StoreError> {
        let hash = sqlx::query_scalar::<_, String>(
            r#"
            SELECT password_hash
            FROM users
            WHERE username = ?
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(hash)
    }

    async fn create(&self, username: &str, password_hash: &str) -> Result<(), StoreError> {
        // A single INSERT is atomic; the UNIQUE constraint settles races.
        sqlx::query(
            r#"
            INSERT INTO users (username, password_hash)
            VALUES (?, ?)
            "#,
        )
        .bind(username)
        .bind(password_hash)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        crate::db::health_check(&self.pool)
            .await
            .map_err(StoreError::Backend)
    }
}
