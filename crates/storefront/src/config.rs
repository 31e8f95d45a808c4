//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `SHOP_STORAGE_PATH` - Cart storage file (default: .pocket-shop/storage.json)
//! - `SHOP_CATALOG` - Catalog file path or http(s) URL (default: data/products.json)
//! - `SHOP_CURRENCY` - Display currency code (default: USD)
//! - `SHOP_EXCHANGE_RATE` - Catalog-to-display conversion rate, > 0 (default: 1)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::path::PathBuf;
use std::str::FromStr;

use pocket_shop_core::{CurrencyCode, DisplayCurrency};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::catalog::CatalogSource;

const DEFAULT_STORAGE_PATH: &str = ".pocket-shop/storage.json";
const DEFAULT_CATALOG: &str = "data/products.json";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// File backing cart storage
    pub storage_path: PathBuf,
    /// Where products are read from
    pub catalog: CatalogSource,
    /// Currency prices are shown and stored in
    pub currency: DisplayCurrency,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let storage_path = PathBuf::from(get_or_default(&lookup, "SHOP_STORAGE_PATH", DEFAULT_STORAGE_PATH));

        let catalog_location = get_or_default(&lookup, "SHOP_CATALOG", DEFAULT_CATALOG);
        let catalog = CatalogSource::parse(&catalog_location).map_err(|e| invalid("SHOP_CATALOG", e))?;

        let code = get_or_default(&lookup, "SHOP_CURRENCY", "USD")
            .parse::<CurrencyCode>()
            .map_err(|e| invalid("SHOP_CURRENCY", e))?;
        let rate = Decimal::from_str(get_or_default(&lookup, "SHOP_EXCHANGE_RATE", "1").trim())
            .map_err(|e| invalid("SHOP_EXCHANGE_RATE", e))?;
        let currency = DisplayCurrency::new(code, rate).map_err(|e| invalid("SHOP_EXCHANGE_RATE", e))?;

        Ok(Self {
            storage_path,
            catalog,
            currency,
            sentry_dsn: get_optional(&lookup, "SENTRY_DSN"),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional variable, treating blank values as unset.
fn get_optional(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    lookup(key).filter(|v| !v.trim().is_empty())
}

/// Get a variable with a default value.
fn get_or_default(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: &str) -> String {
    get_optional(lookup, key).unwrap_or_else(|| default.to_string())
}

fn invalid(key: &str, err: impl std::fmt::Display) -> ConfigError {
    ConfigError::InvalidEnvVar(key.to_string(), err.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<StorefrontConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        StorefrontConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.storage_path, PathBuf::from(DEFAULT_STORAGE_PATH));
        assert_eq!(
            config.catalog,
            CatalogSource::File(PathBuf::from(DEFAULT_CATALOG))
        );
        assert_eq!(config.currency, DisplayCurrency::default());
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("SHOP_CATALOG", "https://shop.test/products.json"),
            ("SHOP_CURRENCY", "inr"),
            ("SHOP_EXCHANGE_RATE", "83.5"),
            ("SENTRY_DSN", "https://key@sentry.test/1"),
        ])
        .unwrap();
        assert!(matches!(config.catalog, CatalogSource::Http(_)));
        assert_eq!(config.currency.code(), CurrencyCode::INR);
        assert_eq!(config.currency.rate(), Decimal::from_str("83.5").unwrap());
        assert!(config.sentry_dsn.is_some());
    }

    #[test]
    fn test_blank_values_use_defaults() {
        let config = load(&[("SHOP_CURRENCY", "  "), ("SENTRY_DSN", "")]).unwrap();
        assert_eq!(config.currency.code(), CurrencyCode::USD);
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_invalid_values() {
        for (key, value) in [
            ("SHOP_CURRENCY", "XYZ"),
            ("SHOP_EXCHANGE_RATE", "abc"),
            ("SHOP_EXCHANGE_RATE", "0"),
            ("SHOP_CATALOG", "http://"),
        ] {
            let err = load(&[(key, value)]).unwrap_err();
            let ConfigError::InvalidEnvVar(name, _) = err;
            assert_eq!(name, key);
        }
    }
}
