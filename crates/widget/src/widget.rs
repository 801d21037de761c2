//! The widget lifecycle.
//!
//! An [`UpsellWidget`] is a cheaply cloneable handle over one widget
//! instance: its cache, its in-flight request and its view. Every call to
//! [`UpsellWidget::activate`] supersedes the previous activation; only the
//! latest activation may change the view.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use askama::Template;
use cart_upsells_core::{RequestKey, WidgetAttributes, WidgetParameters, WidgetState};
use tracing::{Span, debug, field, info, instrument};
use uuid::Uuid;

use crate::carousel::assemble;
use crate::config::MarkupContract;
use crate::error::{Result, UpsellError};
use crate::fetcher::{RecommendationFetcher, RecommendationSource, RequestTicket};
use crate::filter::filter_products;
use crate::page::CartSource;
use crate::view::WidgetView;

/// How an activation ended.
#[derive(Debug)]
pub enum Activation {
    /// The host is hidden; nothing was done.
    Inert,
    /// A carousel is shown.
    Rendered {
        /// Number of slides.
        slides: usize,
        /// Whether the recommendations came from the cache.
        cached: bool,
    },
    /// The widget is hidden.
    Hidden(UpsellError),
    /// A newer activation (or a detach) took over; this one changed nothing.
    Superseded,
}

/// A cart upsells widget instance.
pub struct UpsellWidget<S, P> {
    inner: Arc<WidgetInner<S, P>>,
}

struct WidgetInner<S, P> {
    id: Uuid,
    fetcher: RecommendationFetcher<S>,
    page: P,
    view: Mutex<WidgetView>,
    epoch: AtomicU64,
}

impl<S, P> Clone for UpsellWidget<S, P> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct Rendered {
    markup: String,
    slides: usize,
}

impl<S, P> UpsellWidget<S, P>
where
    S: RecommendationSource,
    P: CartSource,
{
    /// Create a widget instance with an empty cache.
    #[must_use]
    pub fn new(source: S, page: P, contract: &MarkupContract) -> Self {
        Self {
            inner: Arc::new(WidgetInner {
                id: Uuid::new_v4(),
                fetcher: RecommendationFetcher::new(source, contract.clone()),
                page,
                view: Mutex::new(WidgetView::default()),
                epoch: AtomicU64::new(0),
            }),
        }
    }

    /// Instance id, recorded on every span.
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.inner.id
    }

    /// The instance's recommendation fetcher.
    #[must_use]
    pub fn fetcher(&self) -> &RecommendationFetcher<S> {
        &self.inner.fetcher
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> WidgetState {
        self.lock_view().state
    }

    /// Snapshot of the current view.
    #[must_use]
    pub fn view(&self) -> WidgetView {
        self.lock_view().clone()
    }

    /// Run the pipeline for the host's current attributes.
    ///
    /// Cheap and side-effect free when the host is hidden. Otherwise it
    /// supersedes any earlier activation, hides the widget when parameters are
    /// missing, and fetches, filters and renders recommendations.
    #[instrument(skip_all, fields(widget_id = %self.inner.id, item_id = field::Empty))]
    pub async fn activate(&self, attributes: &WidgetAttributes) -> Activation {
        if attributes.hidden {
            debug!("Widget hidden by host, skipping activation");
            return Activation::Inert;
        }

        let (epoch, ticket) = self.supersede();

        let params = match attributes.parameters() {
            Ok(params) => params,
            Err(e) => {
                self.inner.fetcher.retire(&ticket);
                return self.conclude(epoch, Err(e.into()), false);
            }
        };
        Span::current().record("item_id", params.item_id.as_str());

        let key = params.request_key();
        let cached = self.inner.fetcher.is_cached(&key);
        if !cached && !self.apply(epoch, WidgetView::begin_loading) {
            return Activation::Superseded;
        }

        let result = self.run(&key, &params, &ticket).await;
        self.conclude(epoch, result, cached)
    }

    /// Detach the widget: cancel any in-flight request and make pending
    /// activations inert.
    pub fn deactivate(&self) {
        let mut view = self.lock_view();
        self.inner.epoch.fetch_add(1, Ordering::SeqCst);
        self.inner.fetcher.cancel_active();
        view.stop_loading();
        view.reset();
        drop(view);
        debug!(widget_id = %self.inner.id, "Widget detached");
    }

    async fn run(
        &self,
        key: &RequestKey,
        params: &WidgetParameters,
        ticket: &RequestTicket,
    ) -> Result<Rendered> {
        let products = self.inner.fetcher.fetch(key, params, ticket).await?;

        // Read at render time; the cart may have changed since the last activation.
        let cart_item_ids = self.inner.page.cart_item_ids();
        let kept = filter_products(&products, &cart_item_ids, params.max_products);
        debug!(
            fetched = products.len(),
            in_cart = cart_item_ids.len(),
            kept = kept.len(),
            "Filtered recommendations"
        );

        let carousel = assemble(&kept, &params.section_key).ok_or(UpsellError::NoProducts)?;
        Ok(Rendered {
            markup: carousel.render()?,
            slides: carousel.len(),
        })
    }

    /// Start a new activation epoch and claim the request slot.
    ///
    /// Epochs and tickets are handed out under the view lock, so they are
    /// always issued in the same order. Claiming the slot cancels the
    /// previous holder.
    fn supersede(&self) -> (u64, RequestTicket) {
        let mut view = self.lock_view();
        let epoch = self.inner.epoch.fetch_add(1, Ordering::SeqCst) + 1;
        let ticket = self.inner.fetcher.begin();
        view.reset();
        (epoch, ticket)
    }

    /// Apply the outcome of an activation, unless it has been superseded.
    fn conclude(&self, epoch: u64, result: Result<Rendered>, cached: bool) -> Activation {
        let mut view = self.lock_view();
        if self.inner.epoch.load(Ordering::SeqCst) != epoch {
            debug!("Activation superseded, discarding outcome");
            return Activation::Superseded;
        }

        match result {
            Ok(rendered) => {
                info!(slides = rendered.slides, cached, "Rendered cart upsells");
                view.render(rendered.markup);
                Activation::Rendered {
                    slides: rendered.slides,
                    cached,
                }
            }
            Err(e) if e.is_cancelled() => {
                // Cancelled from outside without a newer activation: nothing
                // will conclude after us, so do not leave the indicator on.
                debug!("Fetch cancelled, returning to idle");
                view.stop_loading();
                view.reset();
                Activation::Superseded
            }
            Err(e) => {
                e.report();
                view.hide();
                Activation::Hidden(e)
            }
        }
    }

    /// Run `update` on the view if `epoch` is still current.
    fn apply(&self, epoch: u64, update: impl FnOnce(&mut WidgetView)) -> bool {
        let mut view = self.lock_view();
        if self.inner.epoch.load(Ordering::SeqCst) != epoch {
            return false;
        }
        update(&mut view);
        true
    }

    fn lock_view(&self) -> MutexGuard<'_, WidgetView> {
        self.inner
            .view
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
