//! Widget lifecycle states.
//!
//! ```text
//! Idle ──► Loading ──► Rendered
//!   │                    ▲
//!   └──── (cache hit) ───┘
//!   │
//!   └──► Hidden ◄── Loading
//! ```
//!
//! A later activation re-enters from any terminal state.

use serde::{Deserialize, Serialize};

/// Widget lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WidgetState {
    /// Waiting for an activation.
    #[default]
    Idle,
    /// A network fetch is in flight.
    Loading,
    /// A carousel is visible.
    Rendered,
    /// Nothing is shown.
    Hidden,
}

impl std::fmt::Display for WidgetState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Loading => write!(f, "loading"),
            Self::Rendered => write!(f, "rendered"),
            Self::Hidden => write!(f, "hidden"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_matches_serde() {
        assert_eq!(WidgetState::Loading.to_string(), "loading");
        assert_eq!(WidgetState::default(), WidgetState::Idle);
    }

    #[test]
    fn test_serde_snake_case() {
        let json = serde_json::to_string(&WidgetState::Rendered).unwrap_or_default();
        assert_eq!(json, "\"rendered\"");
    }
}
