//! Core types for the cart upsells widget.
//!
//! This module provides type-safe wrappers for the widget's domain concepts.

pub mod cart;
pub mod id;
pub mod intent;
pub mod key;
pub mod params;
pub mod product;
pub mod status;

pub use cart::CartItemIdSet;
pub use id::*;
pub use intent::RecommendationIntent;
pub use key::RequestKey;
pub use params::{
    DEFAULT_MAX_PRODUCTS, DEFAULT_SECTION_KEY, ParameterError, WidgetAttributes, WidgetParameters,
};
pub use product::RecommendedProduct;
pub use status::WidgetState;
