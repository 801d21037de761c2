//! Widget configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `UPSELL_STOREFRONT_URL` - Base URL relative endpoints (e.g. `/recs`) resolve against
//! - `UPSELL_REQUEST_TIMEOUT_SECS` - HTTP timeout for recommendation requests (default: 10)
//! - `UPSELL_USER_AGENT` - HTTP user agent (default: `cart-upsells/<version>`)
//! - `UPSELL_CARD_SELECTOR` - CSS selector for product cards
//!   (default: `.product-card-wrapper, [data-product-card]`)
//! - `UPSELL_CART_ITEM_ATTRIBUTE` - Attribute tagging cart items with their
//!   product id (default: `data-product-id`)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Default CSS selector matching product cards in the endpoint's response.
pub const DEFAULT_CARD_SELECTOR: &str = ".product-card-wrapper, [data-product-card]";

/// Default attribute carrying a product identifier in cart markup.
pub const DEFAULT_CART_ITEM_ATTRIBUTE: &str = "data-product-id";

/// Tag name of the widget's host element.
pub const HOST_ELEMENT: &str = "cart-upsells";

const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Widget configuration.
#[derive(Debug, Clone, Default)]
pub struct UpsellConfig {
    /// HTTP client configuration
    pub http: HttpConfig,
    /// HTML contract with the endpoint and the cart page
    pub markup: MarkupContract,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g. production, staging)
    pub sentry_environment: Option<String>,
}

/// HTTP client configuration for recommendation requests.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Base URL that relative endpoint URLs are resolved against
    pub storefront_url: Option<Url>,
    /// Request timeout
    pub timeout: Duration,
    /// User agent sent with every request
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            storefront_url: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: default_user_agent(),
        }
    }
}

/// The HTML contract shared with the recommendations endpoint and the cart
/// page.
///
/// Isolates the markup conventions so they can evolve without touching the
/// filter or carousel logic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkupContract {
    /// Selector matching one product card in the endpoint's response
    pub card_selector: String,
    /// Attribute tagging cart items with their product id
    pub cart_item_attribute: String,
}

impl Default for MarkupContract {
    fn default() -> Self {
        Self {
            card_selector: DEFAULT_CARD_SELECTOR.to_string(),
            cart_item_attribute: DEFAULT_CART_ITEM_ATTRIBUTE.to_string(),
        }
    }
}

impl UpsellConfig {
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

        Ok(Self {
            http: HttpConfig::from_env()?,
            markup: MarkupContract::from_env()?,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }
}

impl HttpConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let storefront_url = get_optional_env("UPSELL_STOREFRONT_URL")
            .map(|value| {
                Url::parse(&value).map_err(|e| {
                    ConfigError::InvalidEnvVar("UPSELL_STOREFRONT_URL".to_string(), e.to_string())
                })
            })
            .transpose()?;

        let timeout_secs = get_env_or_default(
            "UPSELL_REQUEST_TIMEOUT_SECS",
            &DEFAULT_TIMEOUT_SECS.to_string(),
        )
        .parse::<u64>()
        .map_err(|e| {
            ConfigError::InvalidEnvVar("UPSELL_REQUEST_TIMEOUT_SECS".to_string(), e.to_string())
        })?;
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "UPSELL_REQUEST_TIMEOUT_SECS".to_string(),
                "must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            storefront_url,
            timeout: Duration::from_secs(timeout_secs),
            user_agent: get_optional_env("UPSELL_USER_AGENT").unwrap_or_else(default_user_agent),
        })
    }
}

impl MarkupContract {
    fn from_env() -> Result<Self, ConfigError> {
        let card_selector = get_env_or_default("UPSELL_CARD_SELECTOR", DEFAULT_CARD_SELECTOR);
        validate_selector(&card_selector, "UPSELL_CARD_SELECTOR")?;

        let cart_item_attribute =
            get_env_or_default("UPSELL_CART_ITEM_ATTRIBUTE", DEFAULT_CART_ITEM_ATTRIBUTE);
        validate_attribute_name(&cart_item_attribute, "UPSELL_CART_ITEM_ATTRIBUTE")?;

        Ok(Self {
            card_selector,
            cart_item_attribute,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn default_user_agent() -> String {
    format!("cart-upsells/{}", env!("CARGO_PKG_VERSION"))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Validate that a value parses as a CSS selector.
fn validate_selector(selector: &str, var_name: &str) -> Result<(), ConfigError> {
    scraper::Selector::parse(selector)
        .map(|_| ())
        .map_err(|e| ConfigError::InvalidEnvVar(var_name.to_string(), e.to_string()))
}

/// Validate that a value is a usable HTML attribute name.
fn validate_attribute_name(name: &str, var_name: &str) -> Result<(), ConfigError> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == ':');
    if valid {
        Ok(())
    } else {
        Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            format!("'{name}' is not an attribute name"),
        ))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_markup_contract_defaults() {
        let contract = MarkupContract::default();
        assert_eq!(contract.card_selector, DEFAULT_CARD_SELECTOR);
        assert_eq!(contract.cart_item_attribute, "data-product-id");
    }

    #[test]
    fn test_default_selector_is_valid() {
        assert!(validate_selector(DEFAULT_CARD_SELECTOR, "TEST_VAR").is_ok());
    }

    #[test]
    fn test_invalid_selector() {
        let result = validate_selector("div[", "TEST_VAR");
        assert!(matches!(result, Err(ConfigError::InvalidEnvVar(_, _))));
    }

    #[test]
    fn test_attribute_name_validation() {
        assert!(validate_attribute_name("data-product-id", "TEST_VAR").is_ok());
        assert!(validate_attribute_name("data product", "TEST_VAR").is_err());
        assert!(validate_attribute_name("data-\"id\"", "TEST_VAR").is_err());
    }

    #[test]
    fn test_http_defaults() {
        let http = HttpConfig::default();
        assert_eq!(http.timeout, Duration::from_secs(10));
        assert!(http.user_agent.starts_with("cart-upsells/"));
        assert!(http.storefront_url.is_none());
    }
}
