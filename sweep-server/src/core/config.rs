//! Server configuration
//!
//! All options load from environment variables. The external-dependency
//! credentials are required: missing any of them is a fatal configuration
//! error at boot, not a runtime error.
//!
//! | Environment variable | Required | Default | Purpose |
//! |----------------------|----------|---------|---------|
//! | DATABASE_PATH | yes | - | embedded database directory |
//! | OBJECT_STORE_URL | yes | - | image CDN base URL |
//! | OBJECT_STORE_TOKEN | yes | - | image CDN credential |
//! | CLASSIFIER_API_KEY | yes | - | classification service credential |
//! | CLASSIFIER_URL | no | http://localhost:8091 | classification service base URL |
//! | HTTP_PORT | no | 3000 | HTTP API port |
//! | WEBHOOK_URL | no | - | ticket-created notification endpoint |
//! | REQUEST_TIMEOUT_MS | no | 30000 | outbound call timeout |
//! | ENVIRONMENT | no | development | development \| staging \| production |
//! | JWT_SECRET | see auth | - | token signing secret |

use thiserror::Error;

use crate::auth::JwtConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    Missing(&'static str),
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP API port
    pub http_port: u16,
    /// Embedded database directory
    pub database_path: String,
    /// Image CDN base URL
    pub object_store_url: String,
    /// Image CDN credential
    pub object_store_token: String,
    /// Classification service base URL
    pub classifier_url: String,
    /// Classification service credential
    pub classifier_api_key: String,
    /// Optional ticket-created webhook endpoint
    pub webhook_url: Option<String>,
    /// Timeout for outbound calls (object store, classifier) in millis
    pub request_timeout_ms: u64,
    /// JWT configuration
    pub jwt: JwtConfig,
    /// Runtime environment: development | staging | production
    pub environment: String,
}

fn require(name: &'static str) -> Result<String, ConfigError> {
    match std::env::var(name) {
        Ok(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ConfigError::Missing(name)),
    }
}

impl Config {
    /// Load configuration from the environment
    ///
    /// Fails fast when a required variable is absent.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            database_path: require("DATABASE_PATH")?,
            object_store_url: require("OBJECT_STORE_URL")?,
            object_store_token: require("OBJECT_STORE_TOKEN")?,
            classifier_url: std::env::var("CLASSIFIER_URL")
                .unwrap_or_else(|_| "http://localhost:8091".into()),
            classifier_api_key: require("CLASSIFIER_API_KEY")?,
            webhook_url: std::env::var("WEBHOOK_URL")
                .ok()
                .filter(|v| !v.trim().is_empty()),
            request_timeout_ms: std::env::var("REQUEST_TIMEOUT_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(30000),
            jwt: JwtConfig::default(),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
        })
    }

    /// Whether this is a production deployment
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}
