//! Configuration for the pick-em API service.

use std::path::PathBuf;
use std::time::Duration;

use pickem_auth_core::{CodecConfig, KeyError, KeyMaterial};

/// Pick-em API configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub http_port: u16,

    /// Path prefix for the session routes, empty or starting with `/`
    pub route_prefix: String,

    /// Request timeout for everything except the probes
    pub request_timeout: Duration,

    /// Session codec configuration (keys and lifetime)
    pub codec: CodecConfig,

    /// Whether issued cookies carry `Secure`
    pub cookie_secure: bool,

    /// JSON user directory
    pub users_file: PathBuf,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Server
        let http_port = parse_or(&lookup, "HTTP_PORT", 8080u16)?;

        let route_prefix = lookup("ROUTE_PREFIX")
            .map(|p| p.trim_end_matches('/').to_string())
            .unwrap_or_default();
        if !route_prefix.is_empty() && !route_prefix.starts_with('/') {
            return Err(ConfigError::Invalid("ROUTE_PREFIX"));
        }

        let request_timeout_secs: u64 = parse_or(&lookup, "REQUEST_TIMEOUT_SECS", 30)?;

        // Session keys (hex)
        let auth_key = lookup("SESSION_AUTH_KEY").ok_or(ConfigError::Missing("SESSION_AUTH_KEY"))?;
        let encryption_key = lookup("SESSION_ENCRYPTION_KEY")
            .ok_or(ConfigError::Missing("SESSION_ENCRYPTION_KEY"))?;
        let keys = KeyMaterial::from_hex(&auth_key, &encryption_key)?;

        // Session lifetime (default 30 days, 0 disables the check)
        let max_age_secs: u64 = parse_or(
            &lookup,
            "SESSION_MAX_AGE_SECS",
            CodecConfig::DEFAULT_MAX_AGE.as_secs(),
        )?;

        let cookie_secure = parse_or(&lookup, "COOKIE_SECURE", false)?;

        let users_file = lookup("USERS_FILE")
            .map(PathBuf::from)
            .ok_or(ConfigError::Missing("USERS_FILE"))?;

        let codec = CodecConfig::new(keys).with_max_age(Duration::from_secs(max_age_secs));

        Ok(Self {
            http_port,
            route_prefix,
            request_timeout: Duration::from_secs(request_timeout_secs),
            codec,
            cookie_secure,
            users_file,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid(key)),
        None => Ok(default),
    }
}

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),

    #[error("Session key error: {0}")]
    Keys(#[from] KeyError),
}
