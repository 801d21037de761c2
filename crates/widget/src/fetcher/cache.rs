//! Per-widget result cache.

use std::sync::Arc;

use cart_upsells_core::{RecommendedProduct, RequestKey};
use moka::future::Cache;

/// Products as stored in (and served from) the cache.
pub type CachedProducts = Arc<[RecommendedProduct]>;

/// Recommendation results keyed by request.
///
/// Scoped to one widget instance. Entries are never evicted or expired: the
/// cache is built without capacity or time-to-live, so it only grows for the
/// lifetime of the widget. Empty results are cached like any other.
#[derive(Clone)]
pub struct RecommendationCache {
    inner: Cache<RequestKey, CachedProducts>,
}

impl RecommendationCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Cache::builder().build(),
        }
    }

    /// Look up the products for a request.
    pub async fn get(&self, key: &RequestKey) -> Option<CachedProducts> {
        self.inner.get(key).await
    }

    /// Whether a result is cached for the request.
    #[must_use]
    pub fn contains(&self, key: &RequestKey) -> bool {
        self.inner.contains_key(key)
    }

    /// Store the products for a request.
    pub async fn insert(&self, key: RequestKey, products: CachedProducts) {
        self.inner.insert(key, products).await;
    }
}

impl Default for RecommendationCache {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RecommendationCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecommendationCache")
            .field("entries", &self.inner.entry_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use cart_upsells_core::{ProductId, WidgetParameters};

    use super::*;

    #[tokio::test]
    async fn test_insert_then_get() {
        let cache = RecommendationCache::new();
        let key = WidgetParameters::new("123", "/recs").request_key();
        assert!(cache.get(&key).await.is_none());

        let products: CachedProducts =
            vec![RecommendedProduct::new(Some(ProductId::new("a")), "<div></div>")].into();
        cache.insert(key.clone(), products.clone()).await;

        assert!(cache.contains(&key));
        assert_eq!(cache.get(&key).await.as_deref(), Some(&*products));
    }

    #[tokio::test]
    async fn test_empty_results_are_cached() {
        let cache = RecommendationCache::new();
        let key = WidgetParameters::new("123", "/recs").request_key();
        cache.insert(key.clone(), Vec::new().into()).await;

        let cached = cache.get(&key).await;
        assert!(cached.is_some_and(|products| products.is_empty()));
    }
}
