//! Haven Configuration Management
//!
//! Handles configuration from environment variables. Deployment secrets
//! (token signing key, CAPTCHA secret, database URL) are required: loading
//! fails before the service binds a socket rather than falling back to a
//! hardcoded default.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Seven days, the fixed validity window for session tokens.
pub const DEFAULT_TOKEN_TTL_SECS: u64 = 7 * 24 * 60 * 60;

/// Default reCAPTCHA verification endpoint.
pub const DEFAULT_CAPTCHA_VERIFY_URL: &str = "https://www.google.com/recaptcha/api/siteverify";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Server configuration
    pub server: ServerConfig,

    /// Database connection
    pub database: DatabaseConfig,

    /// Token issuance configuration
    pub auth: AuthConfig,

    /// CAPTCHA verification configuration
    pub captcha: CaptchaConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// Returns `ConfigError::MissingVar` when a required secret is absent;
    /// callers must treat this as fatal at startup.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut server = ServerConfig::default();

        if let Ok(host) = std::env::var("API_HOST") {
            server.host = host;
        }
        if let Ok(port) = std::env::var("API_PORT") {
            server.port = port.parse().map_err(|_| ConfigError::InvalidValue {
                key: "API_PORT".to_string(),
                value: port,
            })?;
        }
        if let Ok(origins) = std::env::var("CORS_ORIGINS") {
            server.cors_origins = origins
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        let database = DatabaseConfig {
            url: require_var("DATABASE_URL")?,
            pool_size: std::env::var("DATABASE_POOL_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5),
        };

        let auth = AuthConfig {
            jwt_secret: require_var("JWT_SECRET")?,
            token_ttl_secs: match std::env::var("TOKEN_TTL_SECS") {
                Ok(v) => v.parse().map_err(|_| ConfigError::InvalidValue {
                    key: "TOKEN_TTL_SECS".to_string(),
                    value: v,
                })?,
                Err(_) => DEFAULT_TOKEN_TTL_SECS,
            },
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "haven-api".to_string()),
        };

        let captcha = CaptchaConfig {
            secret: require_var("RECAPTCHA_SECRET")?,
            verify_url: std::env::var("RECAPTCHA_VERIFY_URL")
                .unwrap_or_else(|_| DEFAULT_CAPTCHA_VERIFY_URL.to_string()),
        };

        Ok(Self {
            server,
            database,
            auth,
            captcha,
        })
    }
}

fn require_var(key: &'static str) -> Result<String, ConfigError> {
    match std::env::var(key) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::MissingVar(key)),
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Allowed origins for CORS
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            // Empty by default for security - set via CORS_ORIGINS env var
            cors_origins: vec![],
        }
    }
}

/// Database connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Connection pool size
    pub pool_size: u32,
}

/// Token issuance configuration
///
/// There is deliberately no `Default` impl: a signing secret must always be
/// provided explicitly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret key for HMAC signing
    pub jwt_secret: String,

    /// Session token validity window in seconds
    pub token_ttl_secs: u64,

    /// Token issuer identifier
    pub issuer: String,
}

/// CAPTCHA verification configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptchaConfig {
    /// Shared secret for the verification service
    pub secret: String,

    /// Verification endpoint URL
    pub verify_url: String,
}

/// Resolve the client session file path, honoring an explicit override.
///
/// Falls back to `$HOME/.haven/session.json` when no override is given.
pub fn default_session_path() -> PathBuf {
    if let Ok(path) = std::env::var("HAVEN_SESSION_FILE") {
        return PathBuf::from(path);
    }
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".haven").join("session.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_config_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert!(config.cors_origins.is_empty());
    }

    #[test]
    fn test_default_token_ttl_is_seven_days() {
        assert_eq!(DEFAULT_TOKEN_TTL_SECS, 604_800);
    }

    #[test]
    fn test_missing_var_error_names_the_variable() {
        let err = ConfigError::MissingVar("JWT_SECRET");
        assert!(err.to_string().contains("JWT_SECRET"));
    }

    #[test]
    fn test_session_path_override() {
        std::env::set_var("HAVEN_SESSION_FILE", "/tmp/haven-test-session.json");
        let path = default_session_path();
        assert_eq!(path, PathBuf::from("/tmp/haven-test-session.json"));
        std::env::remove_var("HAVEN_SESSION_FILE");
    }
}
