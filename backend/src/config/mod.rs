//! Configuration management for the Authgate service
//!
//! Configuration is loaded hierarchically:
//! 1. Default values (in code)
//! 2. TOML config files (config/development.toml or config/production.toml)
//! 3. Environment variables (prefix: AUTHGATE__)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Signing secret shipped for local development only
pub const DEVELOPMENT_SECRET: &str = "development-secret-change-in-production";

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub rate_limit: RateLimitConfig,
    pub password: PasswordConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Upper bound on total handling time for a single request
    pub request_timeout_secs: u64,
}

/// Credential store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

/// JWT configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub token_expiry_secs: i64,
}

/// Sliding-window limits applied to `/login` and `/register`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    pub max_requests: usize,
    pub window_secs: u64,
    /// How often fully stale client keys are purged
    pub cleanup_interval_secs: u64,
}

impl RateLimitConfig {
    pub fn window(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }

    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval_secs)
    }
}

/// Password hashing algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    Bcrypt,
    Argon2,
}

/// Password hashing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordConfig {
    pub algorithm: HashAlgorithm,
    /// Work factor used when `algorithm` is bcrypt
    pub bcrypt_cost: u32,
}

/// Log output configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Optional file that mirrors everything written to stdout
    pub file: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8888,
                request_timeout_secs: 5,
            },
            database: DatabaseConfig {
                url: "sqlite://users.db".to_string(),
                max_connections: 5,
            },
            jwt: JwtConfig {
                secret: DEVELOPMENT_SECRET.to_string(),
                token_expiry_secs: 3600, // 1 hour
            },
            rate_limit: RateLimitConfig {
                max_requests: 100,
                window_secs: 60,
                cleanup_interval_secs: 300,
            },
            password: PasswordConfig {
                algorithm: HashAlgorithm::Bcrypt,
                bcrypt_cost: 10,
            },
            logging: LoggingConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from files and environment
    ///
    /// Loading order (later sources override earlier):
    /// 1. Default values
    /// 2. Config file based on RUST_ENV (development.toml or production.toml)
    /// 3. Environment variables with AUTHGATE__ prefix
    pub fn load() -> Result<Self> {
        let env = env::var("RUST_ENV").unwrap_or_else(|_| "development".to_string());
        let config_file = format!("config/{}.toml", env);

        let config = config::Config::builder()
            .add_source(config::Config::try_from(&AppConfig::default())?)
            .add_source(config::File::with_name(&config_file).required(false))
            // e.g., AUTHGATE__RATE_LIMIT__MAX_REQUESTS=20 sets rate_limit.max_requests
            .add_source(config::Environment::with_prefix("AUTHGATE").separator("__"))
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// Check if running in production mode
    pub fn is_production() -> bool {
        env::var("RUST_ENV")
            .map(|v| v == "production")
            .unwrap_or(false)
    }

    /// Collect problems that make this configuration unsafe for production
    pub fn production_issues(&self) -> Vec<&'static str> {
        let mut issues = Vec::new();

        if self.jwt.secret == DEVELOPMENT_SECRET || self.jwt.secret.len() < 32 {
            issues.push("JWT secret must be at least 32 characters and not the development default");
        }
        if self.jwt.token_expiry_secs <= 0 {
            issues.push("Token expiry must be positive");
        }
        if self.server.request_timeout_secs == 0 {
            issues.push("Request timeout must be positive");
        }

        issues
    }
}
