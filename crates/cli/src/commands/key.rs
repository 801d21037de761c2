//! Request key command.
//!
//! # Usage
//!
//! ```bash
//! upsells key -i 123 -e /recommendations/products -s cart-drawer-upsells
//! upsells key -i 123 -e /recommendations/products --intent related
//! ```

use cart_upsells_core::{
    DEFAULT_SECTION_KEY, ProductId, RecommendationIntent, RequestKey, WidgetParameters,
};

/// Build the request key for these parameters.
///
/// The widget itself always asks for complementary products; other intents
/// are for inspecting what the endpoint returns for them.
pub fn request_key(
    item_id: &str,
    endpoint_url: &str,
    section_key: Option<String>,
    intent: RecommendationIntent,
) -> RequestKey {
    if intent == RecommendationIntent::Complementary {
        let mut params = WidgetParameters::new(item_id, endpoint_url);
        if let Some(section_key) = section_key {
            params = params.with_section_key(section_key);
        }
        return params.request_key();
    }

    RequestKey::derive(
        endpoint_url,
        &ProductId::new(item_id),
        section_key.as_deref().unwrap_or(DEFAULT_SECTION_KEY),
        intent,
    )
}
