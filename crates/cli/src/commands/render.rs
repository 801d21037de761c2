//! Render command.
//!
//! Reads a saved cart page, takes the widget attributes from its
//! `<cart-upsells>` element and activates the widget against the live
//! recommendations endpoint.
//!
//! # Usage
//!
//! ```bash
//! UPSELL_STOREFRONT_URL=https://shop.example.com upsells render -p cart.html
//! ```
//!
//! # Environment Variables
//!
//! See [`cart_upsells::UpsellConfig`].

use std::path::{Path, PathBuf};

use cart_upsells::{
    Activation, CartPage, FetchFailure, HttpSource, UpsellConfig, UpsellWidget,
    WidgetView,
};
use cart_upsells_core::WidgetAttributes;
use serde::Serialize;
use thiserror::Error;
use tracing::info;

/// Errors that can occur while rendering.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The cart page could not be read.
    #[error("Failed to read {path}: {source}")]
    ReadPage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The HTTP client could not be built.
    #[error("HTTP client error: {0}")]
    Client(#[from] FetchFailure),

    /// The summary could not be serialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The widget ended hidden.
    #[error("Widget hidden: {0}")]
    Hidden(String),
}

/// Command-line overrides for the host element's attributes.
#[derive(Debug, Default)]
pub struct Overrides {
    pub item_id: Option<String>,
    pub endpoint_url: Option<String>,
    pub max_products: Option<usize>,
    pub section_key: Option<String>,
}

impl Overrides {
    fn apply(self, attributes: &mut WidgetAttributes) {
        if let Some(item_id) = self.item_id {
            attributes.item_id = Some(item_id);
        }
        if let Some(endpoint_url) = self.endpoint_url {
            attributes.endpoint_url = Some(endpoint_url);
        }
        if let Some(max_products) = self.max_products {
            attributes.max_products = Some(max_products);
        }
        if let Some(section_key) = self.section_key {
            attributes.section_key = Some(section_key);
        }
    }
}

/// JSON summary printed with `--json`.
#[derive(Debug, Serialize)]
struct Summary<'a> {
    widget_id: String,
    #[serde(flatten)]
    view: &'a WidgetView,
    slides: usize,
    cached: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
}

/// Render the upsells for a cart page and print the result.
///
/// # Errors
///
/// Returns an error if the page cannot be read, the HTTP client cannot be
/// built, or the widget ends hidden.
#[allow(clippy::print_stdout)]
pub async fn render(
    config: &UpsellConfig,
    page_path: &Path,
    overrides: Overrides,
    json: bool,
) -> Result<(), RenderError> {
    let markup = std::fs::read_to_string(page_path).map_err(|source| RenderError::ReadPage {
        path: page_path.to_path_buf(),
        source,
    })?;

    let page = CartPage::new(markup, &config.markup);
    let mut attributes = page.widget_attributes().unwrap_or_default();
    overrides.apply(&mut attributes);

    let source = HttpSource::new(&config.http)?;
    let widget = UpsellWidget::new(source, page, &config.markup);
    info!(widget_id = %widget.id(), page = %page_path.display(), "Activating widget");

    let activation = widget.activate(&attributes).await;
    let view = widget.view();

    let (slides, cached, reason) = match &activation {
        Activation::Rendered { slides, cached } => (*slides, *cached, None),
        Activation::Hidden(e) => (0, false, Some(e.to_string())),
        Activation::Inert => (0, false, Some("host element is hidden".to_string())),
        Activation::Superseded => (0, false, Some("activation superseded".to_string())),
    };

    if json {
        let summary = Summary {
            widget_id: widget.id().to_string(),
            view: &view,
            slides,
            cached,
            reason: reason.clone(),
        };
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else if let Some(content) = &view.content {
        println!("{content}");
    }

    match reason {
        Some(reason) => Err(RenderError::Hidden(reason)),
        None => Ok(()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_replace_host_attributes() {
        let mut attributes = WidgetAttributes::from_pairs([
            ("data-product-id", "socks"),
            ("data-url", "/recs"),
            ("data-max-products", "4"),
        ]);
        Overrides {
            item_id: Some("hat".to_string()),
            max_products: Some(2),
            ..Overrides::default()
        }
        .apply(&mut attributes);

        assert_eq!(attributes.item_id.as_deref(), Some("hat"));
        assert_eq!(attributes.endpoint_url.as_deref(), Some("/recs"));
        assert_eq!(attributes.max_products, Some(2));
    }

    #[tokio::test]
    async fn test_missing_page_is_reported() {
        let result = render(
            &UpsellConfig::default(),
            Path::new("/nonexistent/cart.html"),
            Overrides::default(),
            false,
        )
        .await;
        assert!(matches!(result, Err(RenderError::ReadPage { .. })));
    }

    #[tokio::test]
    async fn test_page_without_parameters_ends_hidden() {
        let dir = std::env::temp_dir().join(format!("upsells-cli-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("cart.html");
        std::fs::write(&path, "<html><body><cart-upsells></cart-upsells></body></html>")
            .unwrap();

        let result = render(&UpsellConfig::default(), &path, Overrides::default(), true).await;
        assert!(matches!(result, Err(RenderError::Hidden(_))));
    }
}
