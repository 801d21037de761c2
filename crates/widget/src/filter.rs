//! Removes recommendations that are already in the cart.

use cart_upsells_core::{CartItemIdSet, RecommendedProduct};

/// Keep the products that are not in the cart, up to `max_products`.
///
/// Products without an identifier are always kept. The filter is stable: kept
/// products retain their original relative order. A cap of zero yields an
/// empty result.
#[must_use]
pub fn filter_products(
    products: &[RecommendedProduct],
    cart_item_ids: &CartItemIdSet,
    max_products: usize,
) -> Vec<RecommendedProduct> {
    products
        .iter()
        .filter(|product| {
            product
                .id
                .as_ref()
                .is_none_or(|id| !cart_item_ids.contains(id))
        })
        .take(max_products)
        .cloned()
        .collect()
}
