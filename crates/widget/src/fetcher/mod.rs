//! Recommendation fetching with a per-widget cache and single-flight
//! network access.
//!
//! Every fetch runs on a [`RequestTicket`]. Claiming a ticket cancels the
//! previous one; a fetch is served from the cache when possible, and only a
//! ticket that is still live when its request resolves may write the cache.

mod cache;
mod parse;
mod source;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use cart_upsells_core::{RequestKey, WidgetParameters};
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, warn};

use crate::config::MarkupContract;
use crate::error::FetchFailure;

pub use cache::{CachedProducts, RecommendationCache};
pub use parse::{parse_product_cards, product_id_from_href};
pub use source::{HttpSource, RecommendationSource};

/// The request slot claimed by one activation.
///
/// Obtained from [`RecommendationFetcher::begin`]. Claiming a new slot
/// cancels the previous one, so at most one ticket is live at a time.
#[derive(Debug, Clone)]
pub struct RequestTicket {
    id: u64,
    token: CancellationToken,
}

impl RequestTicket {
    /// Whether a newer request (or an explicit cancel) took the slot.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

/// Fetches recommendations for one widget instance.
pub struct RecommendationFetcher<S> {
    source: S,
    contract: MarkupContract,
    cache: RecommendationCache,
    active: Mutex<Option<RequestTicket>>,
    next_request_id: AtomicU64,
}

impl<S: RecommendationSource> RecommendationFetcher<S> {
    /// Create a fetcher with an empty cache.
    #[must_use]
    pub fn new(source: S, contract: MarkupContract) -> Self {
        Self {
            source,
            contract,
            cache: RecommendationCache::new(),
            active: Mutex::new(None),
            next_request_id: AtomicU64::new(1),
        }
    }

    /// Claim the request slot, cancelling the previous holder.
    ///
    /// The previous ticket is cancelled and the new one installed under one
    /// lock, so a ticket claimed earlier can never displace a later one.
    pub fn begin(&self) -> RequestTicket {
        let ticket = RequestTicket {
            id: self.next_request_id.fetch_add(1, Ordering::Relaxed),
            token: CancellationToken::new(),
        };

        let mut active = self.lock_active();
        if let Some(previous) = active.replace(ticket.clone()) {
            debug!(request_id = previous.id, "Cancelling in-flight request");
            previous.token.cancel();
        }

        ticket
    }

    /// Fetch the recommendations for a request on behalf of `ticket`.
    ///
    /// # Errors
    ///
    /// - [`FetchFailure::EmptyResult`] if there are no product cards (the
    ///   empty result is still cached)
    /// - [`FetchFailure::Cancelled`] if the ticket was superseded before the
    ///   request resolved; nothing is cached in that case
    /// - any other variant if the request or the response failed
    #[instrument(skip_all, fields(key = %key, item_id = %params.item_id, request_id = ticket.id))]
    pub async fn fetch(
        &self,
        key: &RequestKey,
        params: &WidgetParameters,
        ticket: &RequestTicket,
    ) -> Result<CachedProducts, FetchFailure> {
        if let Some(products) = self.cache.get(key).await {
            debug!(count = products.len(), "Cache hit for recommendations");
            self.retire(ticket);
            return non_empty(products);
        }

        debug!("Cache miss, fetching recommendations");
        let body = tokio::select! {
            biased;
            () = ticket.token.cancelled() => Err(FetchFailure::Cancelled),
            body = self.source.get(key) => body,
        };
        let parsed = body.and_then(|body| parse_product_cards(&body, &self.contract));

        if !self.retire(ticket) {
            debug!("Superseded fetch discarded");
            return Err(FetchFailure::Cancelled);
        }

        let products: CachedProducts = match parsed {
            Ok(products) => products.into(),
            Err(e) => {
                warn!(error = %e, "Recommendations request failed");
                return Err(e);
            }
        };

        debug!(count = products.len(), "Caching recommendations");
        self.cache.insert(key.clone(), products.clone()).await;
        non_empty(products)
    }

    /// Whether the request's result is already cached.
    #[must_use]
    pub fn is_cached(&self, key: &RequestKey) -> bool {
        self.cache.contains(key)
    }

    /// The cached result for a request, if any.
    pub async fn cached(&self, key: &RequestKey) -> Option<CachedProducts> {
        self.cache.get(key).await
    }

    /// Cancel the in-flight request, if any.
    pub fn cancel_active(&self) {
        if let Some(previous) = self.lock_active().take() {
            debug!(request_id = previous.id, "Cancelling in-flight request");
            previous.token.cancel();
        }
    }

    /// Whether a request slot is claimed and not yet retired.
    #[must_use]
    pub fn has_active_request(&self) -> bool {
        self.lock_active().is_some()
    }

    /// Release the slot held by `ticket`. Returns `false` if it was
    /// superseded.
    pub fn retire(&self, ticket: &RequestTicket) -> bool {
        let mut active = self.lock_active();
        if ticket.is_cancelled() {
            return false;
        }
        match active.as_ref() {
            Some(current) if current.id == ticket.id => {
                *active = None;
                true
            }
            _ => false,
        }
    }

    fn lock_active(&self) -> MutexGuard<'_, Option<RequestTicket>> {
        self.active.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn non_empty(products: CachedProducts) -> Result<CachedProducts, FetchFailure> {
    if products.is_empty() {
        Err(FetchFailure::EmptyResult)
    } else {
        Ok(products)
    }
}
