//! Cart upsells widget library.
//!
//! When the cart becomes visible the widget fetches complementary product
//! recommendations for the item in cart context, drops the products already
//! in the cart and renders the rest as a carousel of product cards.
//!
//! # Pipeline
//!
//! [`UpsellWidget::activate`] drives
//! [`RecommendationFetcher`] (cache or network) → [`filter_products`] →
//! [`assemble`] and applies the outcome to the widget's [`WidgetView`].
//!
//! # Example
//!
//! ```rust,ignore
//! use cart_upsells::{CartPage, HttpSource, UpsellConfig, UpsellWidget};
//!
//! let config = UpsellConfig::from_env()?;
//! let page = CartPage::new(cart_markup, &config.markup);
//! let attributes = page.widget_attributes().unwrap_or_default();
//!
//! let widget = UpsellWidget::new(HttpSource::new(&config.http)?, page, &config.markup);
//! let activation = widget.activate(&attributes).await;
//! if let Some(markup) = widget.view().content {
//!     println!("{markup}");
//! }
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod carousel;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod filter;
pub mod page;
pub mod view;
pub mod widget;

pub use carousel::{Carousel, SLIDES_PER_VIEW, Slide, assemble};
pub use config::{ConfigError, HttpConfig, MarkupContract, UpsellConfig};
pub use error::{FetchFailure, UpsellError};
pub use fetcher::{HttpSource, RecommendationFetcher, RecommendationSource, RequestTicket};
pub use filter::filter_products;
pub use page::{CartPage, CartSource};
pub use view::WidgetView;
pub use widget::{Activation, UpsellWidget};
