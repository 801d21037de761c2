//! Recommended product records.

use serde::{Deserialize, Serialize};

use super::id::ProductId;

/// One product card returned by the recommendations endpoint.
///
/// `markup` is the card's original rendered fragment. `id` is taken from the
/// card's first `/products/<identifier>` link and is `None` when no such link
/// exists; such products are never filtered out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendedProduct {
    /// Product identifier extracted from the card link.
    pub id: Option<ProductId>,
    /// Full outer markup of the card.
    pub markup: String,
}

impl RecommendedProduct {
    /// Create a product record.
    #[must_use]
    pub fn new(id: Option<ProductId>, markup: impl Into<String>) -> Self {
        Self {
            id,
            markup: markup.into(),
        }
    }

    /// Whether the product's identity could not be determined.
    #[must_use]
    pub const fn is_anonymous(&self) -> bool {
        self.id.is_none()
    }
}
