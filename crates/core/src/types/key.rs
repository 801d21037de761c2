//! Request keys for the per-widget result cache.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::intent::RecommendationIntent;

/// Cache key for one recommendations request.
///
/// The key is the request URL itself, built from the endpoint, the anchor
/// item, the section and the intent. Identical parameters always produce the
/// same key.
///
/// ```
/// use cart_upsells_core::{ProductId, RecommendationIntent, RequestKey};
///
/// let key = RequestKey::derive(
///     "/recs",
///     &ProductId::new("123"),
///     "cart-upsells",
///     RecommendationIntent::Complementary,
/// );
/// assert_eq!(
///     key.as_str(),
///     "/recs?product_id=123&section_id=cart-upsells&intent=complementary"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestKey(String);

impl RequestKey {
    /// Derive the key for a request.
    #[must_use]
    pub fn derive(
        endpoint_url: &str,
        item_id: &ProductId,
        section_key: &str,
        intent: RecommendationIntent,
    ) -> Self {
        let separator = if endpoint_url.contains('?') { '&' } else { '?' };
        Self(format!(
            "{endpoint_url}{separator}product_id={}&section_id={}&intent={}",
            urlencoding::encode(item_id.as_str()),
            urlencoding::encode(section_key),
            intent.as_str(),
        ))
    }

    /// The key as a string; also a valid (possibly relative) request URL.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RequestKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for RequestKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(endpoint: &str, item: &str, section: &str) -> RequestKey {
        RequestKey::derive(
            endpoint,
            &ProductId::new(item),
            section,
            RecommendationIntent::Complementary,
        )
    }

    #[test]
    fn test_identical_parameters_share_a_key() {
        assert_eq!(key("/recs", "123", "cart-upsells"), key("/recs", "123", "cart-upsells"));
    }

    #[test]
    fn test_every_component_changes_the_key() {
        let base = key("/recs", "123", "cart-upsells");
        assert_ne!(base, key("/other", "123", "cart-upsells"));
        assert_ne!(base, key("/recs", "124", "cart-upsells"));
        assert_ne!(base, key("/recs", "123", "drawer-upsells"));
    }

    #[test]
    fn test_endpoint_with_query() {
        let key = key("/recs?locale=en", "123", "cart-upsells");
        assert_eq!(
            key.as_str(),
            "/recs?locale=en&product_id=123&section_id=cart-upsells&intent=complementary"
        );
    }

    #[test]
    fn test_values_are_encoded() {
        let key = key("/recs", "a b&c", "cart-upsells");
        assert!(key.as_str().contains("product_id=a%20b%26c"));
    }
}
