//! Recommendation intents understood by the recommendations endpoint.

use serde::{Deserialize, Serialize};

/// Intent for product recommendations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationIntent {
    /// Related products.
    Related,
    /// Complementary products (what the cart widget asks for).
    #[default]
    Complementary,
}

impl RecommendationIntent {
    /// The query-string value sent as `intent=`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Related => "related",
            Self::Complementary => "complementary",
        }
    }
}

impl std::fmt::Display for RecommendationIntent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RecommendationIntent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "related" => Ok(Self::Related),
            "complementary" => Ok(Self::Complementary),
            _ => Err(format!("invalid recommendation intent: {s}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_complementary() {
        assert_eq!(
            RecommendationIntent::default(),
            RecommendationIntent::Complementary
        );
        assert_eq!(RecommendationIntent::default().as_str(), "complementary");
    }

    #[test]
    fn test_from_str() {
        assert_eq!(
            "related".parse::<RecommendationIntent>().unwrap(),
            RecommendationIntent::Related
        );
        assert!("upsell".parse::<RecommendationIntent>().is_err());
    }
}
