//! Widget parameters.
//!
//! The host element carries the widget's configuration as attributes. They are
//! read into [`WidgetAttributes`] (everything optional) and validated into
//! [`WidgetParameters`] once per activation.

use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::intent::RecommendationIntent;
use super::key::RequestKey;

/// Number of products shown when the host does not say otherwise.
pub const DEFAULT_MAX_PRODUCTS: usize = 9;

/// Section rendered by the recommendations endpoint by default.
pub const DEFAULT_SECTION_KEY: &str = "cart-upsells";

/// Errors that can occur when validating [`WidgetAttributes`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ParameterError {
    /// A required attribute is absent or blank.
    #[error("missing widget parameter: {0}")]
    Missing(&'static str),
}

/// Raw widget attributes as found on the host element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetAttributes {
    /// `data-product-id`: the anchor item.
    pub item_id: Option<String>,
    /// `data-url`: the recommendations endpoint.
    pub endpoint_url: Option<String>,
    /// `data-max-products`.
    pub max_products: Option<usize>,
    /// `data-section-key`.
    pub section_key: Option<String>,
    /// `hidden`: the host explicitly hid the widget.
    #[serde(default)]
    pub hidden: bool,
}

impl WidgetAttributes {
    /// Build attributes from `(name, value)` pairs of the host element.
    ///
    /// Unknown attributes are ignored. An unparsable `data-max-products`
    /// falls back to the default.
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut attributes = Self::default();
        for (name, value) in pairs {
            match name {
                "data-product-id" => attributes.item_id = Some(value.to_owned()),
                "data-url" => attributes.endpoint_url = Some(value.to_owned()),
                "data-max-products" => attributes.max_products = value.trim().parse().ok(),
                "data-section-key" => attributes.section_key = Some(value.to_owned()),
                "hidden" => attributes.hidden = true,
                _ => {}
            }
        }
        attributes
    }

    /// Validate the attributes into parameters.
    ///
    /// # Errors
    ///
    /// Returns [`ParameterError::Missing`] if the item id or endpoint URL is
    /// absent or blank.
    pub fn parameters(&self) -> Result<WidgetParameters, ParameterError> {
        let item_id =
            non_blank(self.item_id.as_deref()).ok_or(ParameterError::Missing("item_id"))?;
        let endpoint_url = non_blank(self.endpoint_url.as_deref())
            .ok_or(ParameterError::Missing("endpoint_url"))?;

        Ok(WidgetParameters {
            item_id: ProductId::new(item_id),
            endpoint_url: endpoint_url.to_owned(),
            max_products: self.max_products.unwrap_or(DEFAULT_MAX_PRODUCTS),
            section_key: non_blank(self.section_key.as_deref())
                .unwrap_or(DEFAULT_SECTION_KEY)
                .to_owned(),
        })
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Validated parameters for one activation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetParameters {
    /// Anchor item the recommendations are computed for.
    pub item_id: ProductId,
    /// Base URL of the recommendations request.
    pub endpoint_url: String,
    /// Upper bound on rendered products.
    pub max_products: usize,
    /// Section the endpoint renders the cards with.
    pub section_key: String,
}

impl WidgetParameters {
    /// Parameters with the default cap and section.
    #[must_use]
    pub fn new(item_id: impl Into<ProductId>, endpoint_url: impl Into<String>) -> Self {
        Self {
            item_id: item_id.into(),
            endpoint_url: endpoint_url.into(),
            max_products: DEFAULT_MAX_PRODUCTS,
            section_key: DEFAULT_SECTION_KEY.to_owned(),
        }
    }

    /// Override the product cap.
    #[must_use]
    pub const fn with_max_products(mut self, max_products: usize) -> Self {
        self.max_products = max_products;
        self
    }

    /// Override the section key.
    #[must_use]
    pub fn with_section_key(mut self, section_key: impl Into<String>) -> Self {
        self.section_key = section_key.into();
        self
    }

    /// Cache key (and request URL) for these parameters.
    #[must_use]
    pub fn request_key(&self) -> RequestKey {
        RequestKey::derive(
            &self.endpoint_url,
            &self.item_id,
            &self.section_key,
            RecommendationIntent::Complementary,
        )
    }
}
