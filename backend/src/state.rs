//! Application state management
//!
//! This module provides the shared application state that is passed
//! to all request handlers via Axum's state extraction.
//!
//! Everything here is built once at startup and cloned cheaply per
//! request. The rate limiter is the only component with mutable state,
//! and it owns its own lock.

use crate::auth::{hasher_from_config, PasswordHasher, TokenService};
use crate::config::AppConfig;
use crate::rate_limit::RateLimiter;
use crate::repositories::{CredentialStore, SqliteCredentialStore};
use crate::services::CredentialService;
use sqlx::SqlitePool;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Pre-initialized token service with cached keys
    pub tokens: TokenService,
    /// Login and registration workflows
    pub credentials: CredentialService,
    /// Admission control for credential endpoints
    pub rate_limiter: Arc<RateLimiter>,
    store: Arc<dyn CredentialStore>,
}

impl AppState {
    /// Create state backed by the SQLite credential store
    pub fn new(db: SqlitePool, config: AppConfig) -> Self {
        let store = Arc::new(SqliteCredentialStore::new(db));
        let hasher = hasher_from_config(&config.password);
        Self::with_components(config, store, hasher)
    }

    /// Create state from explicit store and hasher implementations
    pub fn with_components(
        config: AppConfig,
        store: Arc<dyn CredentialStore>,
        hasher: Arc<dyn PasswordHasher>,
    ) -> Self {
        let tokens = TokenService::new(&config.jwt.secret, config.jwt.token_expiry_secs);
        let credentials = CredentialService::new(Arc::clone(&store), hasher, tokens.clone());
        let rate_limiter = Arc::new(RateLimiter::new(
            config.rate_limit.max_requests,
            config.rate_limit.window(),
        ));

        Self {
            config: Arc::new(config),
            tokens,
            credentials,
            rate_limiter,
            store,
        }
    }

    /// Get a reference to the configuration
    #[inline]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Get a reference to the token service
    #[inline]
    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    #[inline]
    pub fn credentials(&self) -> &CredentialService {
        &self.credentials
    }

    #[inline]
    pub fn rate_limiter(&self) -> &Arc<RateLimiter> {
        &self.rate_limiter
    }

    #[inline]
    pub fn store(&self) -> &dyn CredentialStore {
        self.store.as_ref()
    }
}
