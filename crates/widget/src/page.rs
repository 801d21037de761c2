//! Read-only access to the surrounding cart page.
//!
//! The widget never writes to the page. It reads the cart's product
//! identifiers each time it renders and, when hosted in a page, its own
//! attributes from the `<cart-upsells>` host element.

use std::sync::{PoisonError, RwLock};

use cart_upsells_core::{CartItemIdSet, WidgetAttributes};
use scraper::{Html, Selector};
use tracing::{debug, warn};

use crate::config::{HOST_ELEMENT, MarkupContract};

/// Source of the products currently in the cart.
///
/// Called at render time on every activation; implementations must not cache
/// a previous answer.
pub trait CartSource: Send + Sync {
    /// Identifiers of the products currently in the cart.
    fn cart_item_ids(&self) -> CartItemIdSet;
}

impl CartSource for CartItemIdSet {
    fn cart_item_ids(&self) -> CartItemIdSet {
        self.clone()
    }
}

impl<T: CartSource> CartSource for std::sync::Arc<T> {
    fn cart_item_ids(&self) -> CartItemIdSet {
        (**self).cart_item_ids()
    }
}

/// A cart page held as markup.
///
/// Cart items are the elements carrying the contract's identifier attribute
/// (`data-product-id` by default). The widget's host element carries the same
/// attribute for its anchor item and is not counted as a cart item.
#[derive(Debug)]
pub struct CartPage {
    markup: RwLock<String>,
    item_attribute: String,
}

impl CartPage {
    /// Wrap the current page markup.
    #[must_use]
    pub fn new(markup: impl Into<String>, contract: &MarkupContract) -> Self {
        Self {
            markup: RwLock::new(markup.into()),
            item_attribute: contract.cart_item_attribute.clone(),
        }
    }

    /// Replace the page markup, e.g. after the cart was updated.
    pub fn replace(&self, markup: impl Into<String>) {
        *self.markup.write().unwrap_or_else(PoisonError::into_inner) = markup.into();
    }

    /// Attributes of the first `<cart-upsells>` element, if the page has one.
    #[must_use]
    pub fn widget_attributes(&self) -> Option<WidgetAttributes> {
        let selector = Selector::parse(HOST_ELEMENT).ok()?;
        let markup = self.markup.read().unwrap_or_else(PoisonError::into_inner);
        let document = Html::parse_document(&markup);

        document
            .select(&selector)
            .next()
            .map(|host| WidgetAttributes::from_pairs(host.value().attrs()))
    }
}

impl CartSource for CartPage {
    fn cart_item_ids(&self) -> CartItemIdSet {
        let selector = match Selector::parse(&format!("[{}]", self.item_attribute)) {
            Ok(selector) => selector,
            Err(e) => {
                warn!(attribute = %self.item_attribute, error = %e, "Invalid cart item attribute");
                return CartItemIdSet::new();
            }
        };

        let markup = self.markup.read().unwrap_or_else(PoisonError::into_inner);
        let document = Html::parse_document(&markup);

        let ids: CartItemIdSet = document
            .select(&selector)
            .filter(|element| element.value().name() != HOST_ELEMENT)
            .filter_map(|element| element.value().attr(&self.item_attribute))
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .collect();

        if ids.is_empty() {
            debug!(attribute = %self.item_attribute, "No cart items found on page");
        }
        ids
    }
}

#[cfg(test)]
mod tests {
    use cart_upsells_core::ProductId;

    use super::*;

    const PAGE: &str = r#"<html><body>
        <form id="cart">
          <div class="cart-item" data-product-id="socks">Socks</div>
          <div class="cart-item" data-product-id="hat">Hat</div>
          <div class="cart-item" data-product-id="">Gift note</div>
        </form>
        <cart-upsells data-product-id="socks" data-url="/recs" data-max-products="4"></cart-upsells>
    </body></html>"#;

    #[test]
    fn test_reads_cart_item_ids() {
        let page = CartPage::new(PAGE, &MarkupContract::default());
        let ids = page.cart_item_ids();

        assert_eq!(ids.len(), 2);
        assert!(ids.contains(&ProductId::new("socks")));
        assert!(ids.contains(&ProductId::new("hat")));
    }

    #[test]
    fn test_reads_fresh_markup_after_replace() {
        let page = CartPage::new(PAGE, &MarkupContract::default());
        page.replace(r#"<div data-product-id="scarf"></div>"#);

        let ids = page.cart_item_ids();
        assert_eq!(ids.len(), 1);
        assert!(ids.contains(&ProductId::new("scarf")));
    }

    #[test]
    fn test_custom_item_attribute() {
        let contract = MarkupContract {
            cart_item_attribute: "data-handle".to_string(),
            ..MarkupContract::default()
        };
        let page = CartPage::new(r#"<li data-handle="mug"></li>"#, &contract);
        assert!(page.cart_item_ids().contains(&ProductId::new("mug")));
    }

    #[test]
    fn test_widget_attributes_from_host() {
        let page = CartPage::new(PAGE, &MarkupContract::default());
        let attributes = page.widget_attributes();

        assert!(attributes.is_some_and(|a| a.item_id.as_deref() == Some("socks")
            && a.endpoint_url.as_deref() == Some("/recs")
            && a.max_products == Some(4)
            && !a.hidden));
    }

    #[test]
    fn test_host_element_is_not_a_cart_item() {
        let page = CartPage::new(
            r#"<cart-upsells data-product-id="socks" data-url="/recs"></cart-upsells>"#,
            &MarkupContract::default(),
        );
        assert!(page.cart_item_ids().is_empty());
    }

    #[test]
    fn test_page_without_host() {
        let page = CartPage::new("<html></html>", &MarkupContract::default());
        assert!(page.widget_attributes().is_none());
    }
}
