//! API configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `TALLY_HOST` - Bind address (default: 127.0.0.1)
//! - `TALLY_PORT` - Listen port (default: 3000)
//! - `TALLY_DEFAULT_PAGE_LIMIT` - Page size when `limit` is omitted (default: 10)
//! - `TALLY_MAX_PAGE_LIMIT` - Largest accepted `limit` (default: 100)
//! - `TALLY_LOG_JSON` - Emit JSON logs when set to `1` or `true`
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error event sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate (default: 0.0)

use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// API application configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Page size limits for list endpoints
    pub pagination: PaginationConfig,
    /// Emit JSON-formatted logs
    pub log_json: bool,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name (e.g. "production")
    pub sentry_environment: Option<String>,
    /// Fraction of error events sent to Sentry
    pub sentry_sample_rate: f32,
    /// Fraction of transactions sent to Sentry
    pub sentry_traces_sample_rate: f32,
}

/// Page size limits for list endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationConfig {
    /// Limit used when the request omits one
    pub default_limit: u32,
    /// Largest limit a request may ask for
    pub max_limit: u32,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_limit: 10,
            max_limit: 100,
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 3000,
            pagination: PaginationConfig::default(),
            log_json: false,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        }
    }
}

impl ApiConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed, or if
    /// the page limits are inconsistent.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let host = parse_or(&lookup, "TALLY_HOST", defaults.host)?;
        let port = parse_or(&lookup, "TALLY_PORT", defaults.port)?;
        let default_limit = parse_or(
            &lookup,
            "TALLY_DEFAULT_PAGE_LIMIT",
            defaults.pagination.default_limit,
        )?;
        let max_limit = parse_or(
            &lookup,
            "TALLY_MAX_PAGE_LIMIT",
            defaults.pagination.max_limit,
        )?;
        let pagination = PaginationConfig::new(default_limit, max_limit)?;

        let log_json = lookup("TALLY_LOG_JSON")
            .is_some_and(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true"));

        Ok(Self {
            host,
            port,
            pagination,
            log_json,
            sentry_dsn: non_empty(lookup("SENTRY_DSN")),
            sentry_environment: non_empty(lookup("SENTRY_ENVIRONMENT")),
            sentry_sample_rate: parse_or(
                &lookup,
                "SENTRY_SAMPLE_RATE",
                defaults.sentry_sample_rate,
            )?,
            sentry_traces_sample_rate: parse_or(
                &lookup,
                "SENTRY_TRACES_SAMPLE_RATE",
                defaults.sentry_traces_sample_rate,
            )?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl PaginationConfig {
    /// Validate and build page limits.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` unless `1 <= default_limit <= max_limit`.
    pub fn new(default_limit: u32, max_limit: u32) -> Result<Self, ConfigError> {
        if default_limit == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "TALLY_DEFAULT_PAGE_LIMIT".to_string(),
                "must be at least 1".to_string(),
            ));
        }
        if default_limit > max_limit {
            return Err(ConfigError::InvalidEnvVar(
                "TALLY_DEFAULT_PAGE_LIMIT".to_string(),
                format!("must not exceed TALLY_MAX_PAGE_LIMIT ({max_limit})"),
            ));
        }
        Ok(Self {
            default_limit,
            max_limit,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse a variable if it is set, otherwise return `default`.
fn parse_or<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match non_empty(lookup(key)) {
        Some(value) => value
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string())),
        None => Ok(default),
    }
}

/// Treat blank values as unset.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<ApiConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        ApiConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3000");
        assert_eq!(config.pagination, PaginationConfig::default());
        assert!(!config.log_json);
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("TALLY_HOST", "0.0.0.0"),
            ("TALLY_PORT", "8080"),
            ("TALLY_DEFAULT_PAGE_LIMIT", "25"),
            ("TALLY_MAX_PAGE_LIMIT", "50"),
            ("TALLY_LOG_JSON", "true"),
            ("SENTRY_ENVIRONMENT", "staging"),
        ])
        .unwrap();

        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:8080");
        assert_eq!(config.pagination.default_limit, 25);
        assert_eq!(config.pagination.max_limit, 50);
        assert!(config.log_json);
        assert_eq!(config.sentry_environment.as_deref(), Some("staging"));
    }

    #[test]
    fn test_invalid_port() {
        let err = load(&[("TALLY_PORT", "not-a-port")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(key, _) if key == "TALLY_PORT"));
    }

    #[test]
    fn test_blank_values_use_defaults() {
        let config = load(&[("TALLY_PORT", "  "), ("SENTRY_DSN", "")]).unwrap();
        assert_eq!(config.port, 3000);
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_default_limit_above_max_rejected() {
        let err = load(&[
            ("TALLY_DEFAULT_PAGE_LIMIT", "200"),
            ("TALLY_MAX_PAGE_LIMIT", "100"),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("TALLY_DEFAULT_PAGE_LIMIT"));
    }

    #[test]
    fn test_zero_default_limit_rejected() {
        assert!(PaginationConfig::new(0, 10).is_err());
        assert!(PaginationConfig::new(10, 10).is_ok());
    }
}
