//! Cart Upsells Core - Shared types library.
//!
//! This crate provides the types shared by the cart upsells components:
//! - `cart-upsells` - The widget lifecycle (fetch, filter, render)
//! - `cli` - Command-line renderer for cart pages
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no HTML
//! parsing. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Product ids, widget parameters, request keys, recommended
//!   products, cart item sets and widget states

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
