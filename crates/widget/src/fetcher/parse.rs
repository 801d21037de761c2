//! Product card extraction from the endpoint's HTML.
//!
//! The response is treated as an opaque document: cards are found with the
//! contract's selector and each card's identity comes from its first link to
//! a `/products/<identifier>` path.

use std::sync::LazyLock;

use cart_upsells_core::{ProductId, RecommendedProduct};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::config::MarkupContract;
use crate::error::FetchFailure;

/// A `/products/<identifier>` segment anywhere in the path of an absolute or
/// relative link (locale prefixes, collection-scoped links).
static PRODUCT_PATH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:https?://[^/?#]+)?(?:/[^?#]*)?/products/([^/?#]+)").expect("Invalid regex")
});

static LINK_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("Invalid selector"));

/// Extract the product cards from a recommendations response.
///
/// Cards nested inside another matching card are skipped so a wrapper and
/// its inner card are counted once.
///
/// # Errors
///
/// Returns [`FetchFailure::Parse`] if the contract's card selector is invalid.
pub fn parse_product_cards(
    body: &str,
    contract: &MarkupContract,
) -> Result<Vec<RecommendedProduct>, FetchFailure> {
    let card_selector = Selector::parse(&contract.card_selector)
        .map_err(|e| FetchFailure::Parse(format!("card selector: {e}")))?;

    let document = Html::parse_document(body);
    let products = document
        .select(&card_selector)
        .filter(|card| !has_matching_ancestor(*card, &card_selector))
        .map(product_from_card)
        .collect();

    Ok(products)
}

fn has_matching_ancestor(card: ElementRef<'_>, selector: &Selector) -> bool {
    card.ancestors()
        .filter_map(ElementRef::wrap)
        .any(|ancestor| selector.matches(&ancestor))
}

fn product_from_card(card: ElementRef<'_>) -> RecommendedProduct {
    let id = card
        .select(&LINK_SELECTOR)
        .filter_map(|link| link.value().attr("href"))
        .find_map(product_id_from_href);

    let product = RecommendedProduct::new(id, card.html());
    if product.is_anonymous() {
        // Fail open: a card we cannot identify is still shown.
        debug!("Product card has no product link; keeping it unfiltered");
    }
    product
}

/// Extract the product identifier from a product detail link.
///
/// ```
/// use cart_upsells::fetcher::product_id_from_href;
///
/// let id = product_id_from_href("/products/wool-socks?variant=1");
/// assert_eq!(id.as_ref().map(|id| id.as_str()), Some("wool-socks"));
/// assert!(product_id_from_href("/collections/all").is_none());
/// ```
#[must_use]
pub fn product_id_from_href(href: &str) -> Option<ProductId> {
    PRODUCT_PATH_RE
        .captures(href.trim())
        .and_then(|captures| captures.get(1))
        .map(|m| ProductId::new(m.as_str()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn card(handle: &str) -> String {
        format!(
            r#"<div class="product-card-wrapper"><a href="/products/{handle}">{handle}</a></div>"#
        )
    }

    #[test]
    fn test_extracts_cards_in_order() {
        let body = format!("<html><body>{}{}{}</body></html>", card("a"), card("b"), card("c"));
        let products = parse_product_cards(&body, &MarkupContract::default()).unwrap();

        let ids: Vec<_> = products
            .iter()
            .map(|p| p.id.as_ref().unwrap().as_str().to_string())
            .collect();
        assert_eq!(ids, ["a", "b", "c"]);
        assert!(products[0].markup.starts_with(r#"<div class="product-card-wrapper">"#));
        assert!(products[0].markup.contains(r#"href="/products/a""#));
    }

    #[test]
    fn test_no_cards() {
        let body = "<html><body><p>Nothing to recommend</p></body></html>";
        let products = parse_product_cards(body, &MarkupContract::default()).unwrap();
        assert!(products.is_empty());
    }

    #[test]
    fn test_card_without_product_link_is_kept() {
        let body = r#"<div data-product-card><a href="/pages/about">About</a></div>"#;
        let products = parse_product_cards(body, &MarkupContract::default()).unwrap();
        assert_eq!(products.len(), 1);
        assert!(products[0].is_anonymous());
    }

    #[test]
    fn test_first_product_link_wins() {
        let body = r#"<div class="product-card-wrapper">
            <a href="/collections/sale">Sale</a>
            <a href="/products/first">First</a>
            <a href="/products/second">Second</a>
        </div>"#;
        let products = parse_product_cards(body, &MarkupContract::default()).unwrap();
        assert_eq!(products[0].id, Some(ProductId::new("first")));
    }

    #[test]
    fn test_nested_cards_counted_once() {
        let body = r#"<div class="product-card-wrapper"><div data-product-card>
            <a href="/products/a">A</a>
        </div></div>"#;
        let products = parse_product_cards(body, &MarkupContract::default()).unwrap();
        assert_eq!(products.len(), 1);
    }

    #[test]
    fn test_invalid_selector() {
        let contract = MarkupContract {
            card_selector: "div[".to_string(),
            ..MarkupContract::default()
        };
        let result = parse_product_cards("<div></div>", &contract);
        assert!(matches!(result, Err(FetchFailure::Parse(_))));
    }

    #[test]
    fn test_product_id_from_href_variants() {
        let id = |href: &str| product_id_from_href(href).map(ProductId::into_inner);

        assert_eq!(id("/products/socks").as_deref(), Some("socks"));
        assert_eq!(id("/products/socks#reviews").as_deref(), Some("socks"));
        assert_eq!(id("/en-ca/products/socks").as_deref(), Some("socks"));
        assert_eq!(
            id("https://shop.example.com/products/socks/").as_deref(),
            Some("socks")
        );
        assert_eq!(
            id("/collections/sale/products/socks").as_deref(),
            Some("socks")
        );
        assert_eq!(
            id("https://shop.example.com/fr/collections/all/products/socks?variant=2").as_deref(),
            Some("socks")
        );
        assert_eq!(id("/collections/all/products"), None);
        assert_eq!(id("/collections/products-on-sale"), None);
        assert_eq!(id("/products/"), None);
    }
}
