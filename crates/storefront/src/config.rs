//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `ORDERAIN_API_URL` - Base URL of the commerce backend
//! - `ORDERAIN_SHOP_ID` - Shop (tenant) identifier used in every backend path
//!
//! ## Optional
//! - `ORDERAIN_CART_DIR` - Directory for persisted client state (default: .orderain)
//! - `ORDERAIN_HTTP_TIMEOUT_SECS` - Per-request timeout (default: 15)
//! - `ORDERAIN_LOOKUP_CACHE_TTL_SECS` - TTL for cached location/category lookups (default: 300)
//! - `ORDERAIN_PAYMENT_METHOD` - Payment method sent with orders (default: COD)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::path::PathBuf;
use std::time::Duration;

use orderain_core::{PaymentMethod, ShopId};
use thiserror::Error;
use url::Url;

const DEFAULT_CART_DIR: &str = ".orderain";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 15;
const DEFAULT_LOOKUP_CACHE_TTL_SECS: u64 = 300;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront client configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Commerce backend connection settings
    pub api: CommerceApiConfig,
    /// Directory holding the persisted cart
    pub cart_dir: PathBuf,
    /// Payment method attached to every order
    pub payment_method: PaymentMethod,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g. production, staging)
    pub sentry_environment: Option<String>,
}

/// Commerce backend configuration.
#[derive(Debug, Clone)]
pub struct CommerceApiConfig {
    /// Backend base URL, always ending in `/` so relative paths join below it
    pub base_url: Url,
    /// Shop (tenant) identifier
    pub shop_id: ShopId,
    /// Timeout applied to every request
    pub timeout: Duration,
    /// Time-to-live for cached lookup lists
    pub lookup_cache_ttl: Duration,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api = CommerceApiConfig::from_lookup(&lookup)?;

        let cart_dir = PathBuf::from(
            non_empty(lookup("ORDERAIN_CART_DIR")).unwrap_or_else(|| DEFAULT_CART_DIR.to_string()),
        );

        let payment_method = match non_empty(lookup("ORDERAIN_PAYMENT_METHOD")) {
            Some(raw) => raw.parse::<PaymentMethod>().map_err(|e| {
                ConfigError::InvalidEnvVar("ORDERAIN_PAYMENT_METHOD".to_string(), e)
            })?,
            None => PaymentMethod::default(),
        };

        Ok(Self {
            api,
            cart_dir,
            payment_method,
            sentry_dsn: non_empty(lookup("SENTRY_DSN")),
            sentry_environment: non_empty(lookup("SENTRY_ENVIRONMENT")),
        })
    }
}

impl CommerceApiConfig {
    /// Create a backend configuration with default timeouts.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if `base_url` is not an absolute URL.
    pub fn new(base_url: &str, shop_id: impl Into<ShopId>) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: parse_base_url("ORDERAIN_API_URL", base_url)?,
            shop_id: shop_id.into(),
            timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            lookup_cache_ttl: Duration::from_secs(DEFAULT_LOOKUP_CACHE_TTL_SECS),
        })
    }

    fn from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let raw_url = get_required(lookup, "ORDERAIN_API_URL")?;
        let shop_id = get_required(lookup, "ORDERAIN_SHOP_ID")?;

        let mut config = Self::new(&raw_url, shop_id)?;
        config.timeout = Duration::from_secs(get_secs(
            lookup,
            "ORDERAIN_HTTP_TIMEOUT_SECS",
            DEFAULT_HTTP_TIMEOUT_SECS,
        )?);
        config.lookup_cache_ttl = Duration::from_secs(get_secs(
            lookup,
            "ORDERAIN_LOOKUP_CACHE_TTL_SECS",
            DEFAULT_LOOKUP_CACHE_TTL_SECS,
        )?);
        Ok(config)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Get a required variable, treating blank values as missing.
fn get_required(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<String, ConfigError> {
    non_empty(lookup(key)).ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get a positive number of seconds with a default.
fn get_secs(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: u64,
) -> Result<u64, ConfigError> {
    let Some(raw) = non_empty(lookup(key)) else {
        return Ok(default);
    };
    let secs = raw
        .trim()
        .parse::<u64>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if secs == 0 {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            "must be greater than zero".to_string(),
        ));
    }
    Ok(secs)
}

/// Parse a base URL and make sure it ends with a slash.
///
/// `Url::join` replaces the last path segment unless the base ends in `/`,
/// so `https://api.example.com/v1` must become `https://api.example.com/v1/`.
fn parse_base_url(key: &str, raw: &str) -> Result<Url, ConfigError> {
    let mut url = Url::parse(raw.trim())
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if url.cannot_be_a_base() {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            "must be an absolute http(s) URL".to_string(),
        ));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config = StorefrontConfig::from_lookup(lookup_from(&[
            ("ORDERAIN_API_URL", "https://api.example.com/v1"),
            ("ORDERAIN_SHOP_ID", "shop-1"),
        ]))
        .unwrap();

        assert_eq!(config.api.base_url.as_str(), "https://api.example.com/v1/");
        assert_eq!(config.api.shop_id.as_str(), "shop-1");
        assert_eq!(config.api.timeout, Duration::from_secs(15));
        assert_eq!(config.api.lookup_cache_ttl, Duration::from_secs(300));
        assert_eq!(config.cart_dir, PathBuf::from(".orderain"));
        assert_eq!(config.payment_method, PaymentMethod::Cod);
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_missing_shop_id() {
        let err = StorefrontConfig::from_lookup(lookup_from(&[(
            "ORDERAIN_API_URL",
            "https://api.example.com",
        )]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(ref key) if key == "ORDERAIN_SHOP_ID"));
    }

    #[test]
    fn test_blank_required_value_counts_as_missing() {
        let err = StorefrontConfig::from_lookup(lookup_from(&[
            ("ORDERAIN_API_URL", "   "),
            ("ORDERAIN_SHOP_ID", "shop-1"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(_)));
    }

    #[test]
    fn test_invalid_url() {
        let err = StorefrontConfig::from_lookup(lookup_from(&[
            ("ORDERAIN_API_URL", "not a url"),
            ("ORDERAIN_SHOP_ID", "shop-1"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(_, _)));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let err = StorefrontConfig::from_lookup(lookup_from(&[
            ("ORDERAIN_API_URL", "https://api.example.com"),
            ("ORDERAIN_SHOP_ID", "shop-1"),
            ("ORDERAIN_HTTP_TIMEOUT_SECS", "0"),
        ]))
        .unwrap_err();
        assert!(
            matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "ORDERAIN_HTTP_TIMEOUT_SECS")
        );
    }

    #[test]
    fn test_unknown_payment_method_rejected() {
        let err = StorefrontConfig::from_lookup(lookup_from(&[
            ("ORDERAIN_API_URL", "https://api.example.com"),
            ("ORDERAIN_SHOP_ID", "shop-1"),
            ("ORDERAIN_PAYMENT_METHOD", "card"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(_, _)));
    }

    #[test]
    fn test_overrides() {
        let config = StorefrontConfig::from_lookup(lookup_from(&[
            ("ORDERAIN_API_URL", "http://localhost:8080/"),
            ("ORDERAIN_SHOP_ID", "shop-2"),
            ("ORDERAIN_CART_DIR", "/tmp/carts"),
            ("ORDERAIN_HTTP_TIMEOUT_SECS", "3"),
            ("ORDERAIN_LOOKUP_CACHE_TTL_SECS", "60"),
            ("SENTRY_DSN", "https://key@sentry.example.com/1"),
        ]))
        .unwrap();

        assert_eq!(config.api.base_url.as_str(), "http://localhost:8080/");
        assert_eq!(config.cart_dir, PathBuf::from("/tmp/carts"));
        assert_eq!(config.api.timeout, Duration::from_secs(3));
        assert_eq!(config.api.lookup_cache_ttl, Duration::from_secs(60));
        assert!(config.sentry_dsn.is_some());
    }
}
