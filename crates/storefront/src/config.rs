//! Catalog API configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `CATALOG_DATABASE_URL` - `PostgreSQL` connection string (falls back to
//!   `DATABASE_URL`; without either the in-memory store is used)
//! - `CATALOG_HOST` - Bind address (default: 127.0.0.1)
//! - `CATALOG_PORT` - Listen port (default: 5001)
//! - `CATALOG_CORS_ORIGINS` - Comma-separated allowed origins (default: any)
//! - `CATALOG_PRICE_DECIMAL_PLACES` - Round computed totals to this many
//!   decimal places (default: exact)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate, 0.0 to 1.0 (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate, 0.0 to 1.0 (default: 0.0)

use std::net::{IpAddr, SocketAddr};

use secrecy::SecretString;
use thiserror::Error;

use printfuse_core::Rounding;

/// Largest accepted `CATALOG_PRICE_DECIMAL_PLACES` (the decimal scale limit).
const MAX_DECIMAL_PLACES: u32 = 28;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Catalog API configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: Option<SecretString>,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Allowed CORS origins; empty means any origin
    pub cors_origins: Vec<String>,
    /// Rounding applied to computed totals
    pub price_rounding: Rounding,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g. "production")
    pub sentry_environment: Option<String>,
    /// Error event sample rate
    pub sentry_sample_rate: f32,
    /// Performance trace sample rate
    pub sentry_traces_sample_rate: f32,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            host: IpAddr::from([127, 0, 0, 1]),
            port: 5001,
            cors_origins: Vec::new(),
            price_rounding: Rounding::Exact,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Load configuration through a variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let database_url = var("CATALOG_DATABASE_URL")
            .or_else(|| var("DATABASE_URL"))
            .filter(|url| !url.trim().is_empty())
            .map(SecretString::from);

        let host = parse_or("CATALOG_HOST", var("CATALOG_HOST"), defaults.host)?;
        let port = parse_or("CATALOG_PORT", var("CATALOG_PORT"), defaults.port)?;
        let cors_origins = var("CATALOG_CORS_ORIGINS")
            .map(|v| parse_origins(&v))
            .unwrap_or_default();
        let price_rounding = parse_rounding(var("CATALOG_PRICE_DECIMAL_PLACES"))?;

        let sentry_sample_rate = parse_sample_rate(
            "SENTRY_SAMPLE_RATE",
            var("SENTRY_SAMPLE_RATE"),
            defaults.sentry_sample_rate,
        )?;
        let sentry_traces_sample_rate = parse_sample_rate(
            "SENTRY_TRACES_SAMPLE_RATE",
            var("SENTRY_TRACES_SAMPLE_RATE"),
            defaults.sentry_traces_sample_rate,
        )?;

        Ok(Self {
            database_url,
            host,
            port,
            cors_origins,
            price_rounding,
            sentry_dsn: var("SENTRY_DSN").filter(|v| !v.is_empty()),
            sentry_environment: var("SENTRY_ENVIRONMENT").filter(|v| !v.is_empty()),
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Database URL, or an error naming the variable to set.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEnvVar` when no URL is configured.
    pub fn require_database_url(&self) -> Result<&SecretString, ConfigError> {
        self.database_url
            .as_ref()
            .ok_or_else(|| ConfigError::MissingEnvVar("CATALOG_DATABASE_URL".to_string()))
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse a variable if present, otherwise use the default.
fn parse_or<T>(key: &str, value: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.map_or(Ok(default), |v| {
        v.trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    })
}

/// Split a comma-separated origin list, dropping blanks.
fn parse_origins(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(String::from)
        .collect()
}

fn parse_rounding(value: Option<String>) -> Result<Rounding, ConfigError> {
    const KEY: &str = "CATALOG_PRICE_DECIMAL_PLACES";
    let Some(value) = value.filter(|v| !v.trim().is_empty()) else {
        return Ok(Rounding::Exact);
    };
    let places: u32 = parse_or(KEY, Some(value), 0)?;
    if places > MAX_DECIMAL_PLACES {
        return Err(ConfigError::InvalidEnvVar(
            KEY.to_string(),
            format!("must be at most {MAX_DECIMAL_PLACES}"),
        ));
    }
    Ok(Rounding::DecimalPlaces(places))
}

fn parse_sample_rate(key: &str, value: Option<String>, default: f32) -> Result<f32, ConfigError> {
    let rate = parse_or(key, value, default)?;
    if !(0.0..=1.0).contains(&rate) {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("must be between 0.0 and 1.0 (got {rate})"),
        ));
    }
    Ok(rate)
}
