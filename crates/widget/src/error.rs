//! Error handling with Sentry integration.
//!
//! [`FetchFailure`] is what the recommendation fetcher can fail with;
//! [`UpsellError`] is everything an activation can end in short of a rendered
//! carousel. The widget reduces all of them to "hidden", except cancellation
//! which leaves no trace at all.

use cart_upsells_core::ParameterError;
use thiserror::Error;

/// Errors that can occur while fetching recommendations.
#[derive(Debug, Error)]
pub enum FetchFailure {
    /// A newer fetch or activation superseded this one.
    #[error("Request cancelled")]
    Cancelled,

    /// The endpoint answered with a non-success status.
    #[error("HTTP {status}: {reason}")]
    Http {
        /// Response status code.
        status: u16,
        /// Canonical reason phrase of the status (`Unknown` when it has none).
        reason: String,
    },

    /// The endpoint rate limited the request.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Connecting, sending or reading the body failed.
    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The request URL could not be built.
    #[error("Invalid request URL {url}: {reason}")]
    InvalidUrl {
        /// The offending URL.
        url: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The response could not be queried for product cards.
    #[error("Parse error: {0}")]
    Parse(String),

    /// The response contained no product cards.
    #[error("No product cards in response")]
    EmptyResult,
}

impl FetchFailure {
    /// Whether the fetch was superseded rather than failed.
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Whether the endpoint simply had nothing to recommend.
    #[must_use]
    pub const fn is_empty_result(&self) -> bool {
        matches!(self, Self::EmptyResult)
    }
}

/// Reasons an activation did not end with a rendered carousel.
#[derive(Debug, Error)]
pub enum UpsellError {
    /// The host element lacks a required attribute.
    #[error("Missing parameters: {0}")]
    MissingParameters(#[from] ParameterError),

    /// Fetching recommendations failed.
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchFailure),

    /// Every recommendation was filtered out (or the cap is zero).
    #[error("No products left to show")]
    NoProducts,

    /// Rendering the carousel template failed.
    #[error("Render error: {0}")]
    Render(#[from] askama::Error),
}

impl UpsellError {
    /// Whether the activation was superseded by a newer one.
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Fetch(FetchFailure::Cancelled))
    }

    /// Whether this is a genuine failure worth reporting, as opposed to the
    /// widget having nothing to show.
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        match self {
            Self::Fetch(failure) => !failure.is_cancelled() && !failure.is_empty_result(),
            Self::Render(_) => true,
            Self::MissingParameters(_) | Self::NoProducts => false,
        }
    }

    /// Log the error and capture genuine failures to Sentry.
    pub fn report(&self) {
        if self.is_failure() {
            let event_id = sentry::capture_error(self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Cart upsells failed"
            );
        } else if !self.is_cancelled() {
            tracing::debug!(reason = %self, "Cart upsells hidden");
        }
    }
}

/// Result type alias for `UpsellError`.
pub type Result<T> = std::result::Result<T, UpsellError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_failure_display() {
        let err = FetchFailure::Http {
            status: 503,
            reason: "Service Unavailable".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 503: Service Unavailable");

        let err = FetchFailure::RateLimited(30);
        assert_eq!(err.to_string(), "Rate limited, retry after 30 seconds");
    }

    #[test]
    fn test_cancellation_is_distinguishable() {
        let cancelled = UpsellError::from(FetchFailure::Cancelled);
        assert!(cancelled.is_cancelled());
        assert!(!cancelled.is_failure());

        let failed = UpsellError::from(FetchFailure::Http {
            status: 500,
            reason: "Internal Server Error".to_string(),
        });
        assert!(!failed.is_cancelled());
        assert!(failed.is_failure());
    }

    #[test]
    fn test_empty_results_are_not_failures() {
        assert!(!UpsellError::from(FetchFailure::EmptyResult).is_failure());
        assert!(!UpsellError::NoProducts.is_failure());
        assert!(!UpsellError::from(ParameterError::Missing("item_id")).is_failure());
    }

    #[test]
    fn test_missing_parameters_display() {
        let err = UpsellError::from(ParameterError::Missing("endpoint_url"));
        assert_eq!(
            err.to_string(),
            "Missing parameters: missing widget parameter: endpoint_url"
        );
    }
}
