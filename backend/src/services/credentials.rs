//! Registration and login workflows
//!
//! Ordering is fixed: input validation, then hashing or comparison, then
//! storage or token issuance. Hashing and comparison run on the blocking
//! thread pool.

use crate::auth::{PasswordError, PasswordHasher, TokenService};
use crate::error::ApiError;
use crate::repositories::CredentialStore;
use anyhow::anyhow;
use authgate_shared::{validate_credentials, CredentialsRequest, TokenResponse};
use std::sync::Arc;
use tracing::{info, warn};

/// Credential workflows over a pluggable store and hasher
#[derive(Clone)]
pub struct CredentialService {
    store: Arc<dyn CredentialStore>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: TokenService,
}

impl CredentialService {
    pub fn new(
        store: Arc<dyn CredentialStore>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: TokenService,
    ) -> Self {
        Self {
            store,
            hasher,
            tokens,
        }
    }

    /// Register a new user
    ///
    /// Empty fields are rejected before the hasher or store is touched.
    pub async fn register(&self, req: &CredentialsRequest) -> Result<(), ApiError> {
        validate_credentials(req).map_err(ApiError::Validation)?;

        let hasher = Arc::clone(&self.hasher);
        let password = req.password.clone();
        let password_hash = tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| anyhow!("Task join error: {}", e))?
            .map_err(|e| anyhow!(e))?;

        self.store
            .create(&req.username, &password_hash)
            .await
            .map_err(|e| {
                warn!(username = %req.username, error = %e, "Registration failed");
                ApiError::from(e)
            })?;

        info!(username = %req.username, "User registered");
        Ok(())
    }

    /// Login with username and password
    ///
    /// Unknown users and wrong passwords produce the same error.
    pub async fn login(&self, req: &CredentialsRequest) -> Result<TokenResponse, ApiError> {
        validate_credentials(req).map_err(ApiError::Validation)?;

        let Some(stored_hash) = self.store.get_by_username(&req.username).await? else {
            info!(username = %req.username, "Login rejected");
            return Err(ApiError::invalid_credentials());
        };

        let hasher = Arc::clone(&self.hasher);
        let password = req.password.clone();
        let outcome = tokio::task::spawn_blocking(move || hasher.compare(&stored_hash, &password))
            .await
            .map_err(|e| anyhow!("Task join error: {}", e))?;

        match outcome {
            Ok(()) => {}
            Err(PasswordError::Mismatch) => {
                info!(username = %req.username, "Login rejected");
                return Err(ApiError::invalid_credentials());
            }
            Err(e) => return Err(anyhow!(e).into()),
        }

        let access_token = self.tokens.issue(&req.username).map_err(|e| anyhow!(e))?;

        info!(username = %req.username, "User logged in");
        Ok(TokenResponse::bearer(access_token, self.tokens.expiry_secs()))
    }
}
