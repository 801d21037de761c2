//! CLI command implementations.

pub mod key;
pub mod render;
