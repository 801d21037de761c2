//! Integration tests for cart upsells.
//!
//! The tests run the real [`HttpSource`] against a `wiremock` server standing
//! in for the storefront's recommendations endpoint.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p cart-upsells-integration-tests
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

use cart_upsells::{CartPage, HttpConfig, HttpSource, MarkupContract, UpsellWidget};
use cart_upsells_core::WidgetAttributes;
use url::Url;
use wiremock::MockServer;

/// Path of the recommendations endpoint on the mock storefront.
pub const ENDPOINT: &str = "/recommendations/products";

/// Widget wired to a mock storefront and a mutable cart page.
pub type TestWidget = UpsellWidget<HttpSource, Arc<CartPage>>;

/// Recommendations response with one product card per handle.
#[must_use]
pub fn recommendations(handles: &[&str]) -> String {
    let cards: String = handles
        .iter()
        .map(|handle| {
            format!(
                r#"<div class="product-card-wrapper">
  <a href="/products/{handle}?variant=1" class="card__link">{handle}</a>
  <span class="price">$10.00</span>
</div>"#
            )
        })
        .collect();

    format!(
        r#"<!doctype html><html><body>
<div class="shopify-section" id="shopify-section-cart-upsells">{cards}</div>
</body></html>"#
    )
}

/// Cart page holding the given product handles.
#[must_use]
pub fn cart_page(handles: &[&str]) -> String {
    let items: String = handles
        .iter()
        .map(|handle| format!(r#"<tr class="cart-item" data-product-id="{handle}"></tr>"#))
        .collect();

    format!(r#"<html><body><table id="cart">{items}</table></body></html>"#)
}

/// Host attributes pointing the widget at the mock endpoint.
#[must_use]
pub fn attributes(item_id: &str) -> WidgetAttributes {
    WidgetAttributes {
        item_id: Some(item_id.to_string()),
        endpoint_url: Some(ENDPOINT.to_string()),
        ..WidgetAttributes::default()
    }
}

/// HTTP source resolving relative endpoints against the mock server.
///
/// # Panics
///
/// Panics if the mock server URI is not a valid URL.
#[must_use]
pub fn http_source(server: &MockServer) -> HttpSource {
    let config = HttpConfig {
        storefront_url: Some(Url::parse(&server.uri()).expect("Invalid mock server URI")),
        ..HttpConfig::default()
    };
    HttpSource::new(&config).expect("Failed to create HTTP client")
}

/// A fresh widget instance and the cart page it reads.
#[must_use]
pub fn widget(server: &MockServer, cart: &[&str]) -> (TestWidget, Arc<CartPage>) {
    let contract = MarkupContract::default();
    let page = Arc::new(CartPage::new(cart_page(cart), &contract));
    let widget = UpsellWidget::new(http_source(server), Arc::clone(&page), &contract);
    (widget, page)
}

/// Wait until the mock server has received `count` requests.
pub async fn wait_for_requests(server: &MockServer, count: usize) {
    loop {
        let received = server
            .received_requests()
            .await
            .map_or(0, |requests| requests.len());
        if received >= count {
            return;
        }
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }
}
