//! Snapshot of the products currently in the cart.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::id::ProductId;

/// Identifiers of the products currently in the cart.
///
/// Read fresh from page state whenever recommendations are rendered; the
/// widget never mutates it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CartItemIdSet(HashSet<ProductId>);

impl CartItemIdSet {
    /// An empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the cart contains the given product.
    #[must_use]
    pub fn contains(&self, id: &ProductId) -> bool {
        self.0.contains(id)
    }

    /// Number of distinct products in the cart.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the cart holds no products.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<I> FromIterator<I> for CartItemIdSet
where
    I: Into<ProductId>,
{
    fn from_iter<T: IntoIterator<Item = I>>(iter: T) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collects_distinct_ids() {
        let ids: CartItemIdSet = ["a", "b", "a"].into_iter().collect();
        assert_eq!(ids.len(), 2);
        assert!(ids.contains(&ProductId::new("a")));
        assert!(!ids.contains(&ProductId::new("c")));
    }
}
