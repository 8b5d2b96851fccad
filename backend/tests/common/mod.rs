//! Common test utilities for integration tests
//!
//! Each `TestApp` runs the full router over its own in-memory SQLite
//! database, so no external services are needed.

#![allow(dead_code)]

use authgate_backend::{
    config::{AppConfig, HashAlgorithm},
    db, routes,
    state::AppState,
};
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use tower::ServiceExt;

/// Test application wrapper
pub struct TestApp {
    pub app: Router,
    pub state: AppState,
}

impl TestApp {
    /// Create a new test application with default test settings
    pub async fn new() -> Self {
        Self::with_config(test_config()).await
    }

    /// Create a new test application with custom configuration
    pub async fn with_config(config: AppConfig) -> Self {
        // One connection: every connection to sqlite::memory: is a separate database
        let pool = db::create_pool(&config.database.url, 1)
            .await
            .expect("Failed to create test database pool");
        db::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        let state = AppState::new(pool, config);
        let app = routes::create_router(state.clone());

        Self { app, state }
    }

    /// Make a GET request with optional Authorization header
    pub async fn get(&self, path: &str, authorization: Option<&str>) -> (StatusCode, String) {
        let mut builder = Request::builder().method("GET").uri(path);
        if let Some(value) = authorization {
            builder = builder.header("Authorization", value);
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    /// Make a POST request with JSON body
    pub async fn post(&self, path: &str, body: &str) -> (StatusCode, String) {
        self.post_from(path, body, None).await
    }

    /// Make a POST request with JSON body on behalf of a forwarded client
    pub async fn post_from(
        &self,
        path: &str,
        body: &str,
        forwarded_for: Option<&str>,
    ) -> (StatusCode, String) {
        let mut builder = Request::builder()
            .method("POST")
            .uri(path)
            .header("Content-Type", "application/json");
        if let Some(client) = forwarded_for {
            builder = builder.header("X-Forwarded-For", client);
        }
        self.send(builder.body(Body::from(body.to_string())).unwrap())
            .await
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, String) {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body_str = String::from_utf8(body.to_vec()).unwrap();

        (status, body_str)
    }
}

pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.server.port = 0;
    config.database.url = "sqlite::memory:".to_string();
    config.database.max_connections = 1;
    config.jwt.secret = "test-secret-key-for-testing-only-32chars".to_string();
    config.password.algorithm = HashAlgorithm::Bcrypt;
    // Minimum bcrypt cost keeps the suite fast
    config.password.bcrypt_cost = 4;
    config
}
