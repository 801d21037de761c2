//! Network access for recommendation requests.

use std::future::Future;
use std::sync::Arc;

use cart_upsells_core::RequestKey;
use reqwest::StatusCode;
use reqwest::header::ACCEPT;
use tracing::{debug, instrument};
use url::Url;

use crate::config::HttpConfig;
use crate::error::FetchFailure;

/// Something that can answer a recommendations request with an HTML body.
///
/// The request key doubles as the request URL. Implementations must be
/// cancel-safe: dropping the returned future abandons the request.
pub trait RecommendationSource: Send + Sync {
    /// Fetch the response body for a request.
    fn get(&self, key: &RequestKey) -> impl Future<Output = Result<String, FetchFailure>> + Send;
}

impl<S: RecommendationSource> RecommendationSource for Arc<S> {
    fn get(&self, key: &RequestKey) -> impl Future<Output = Result<String, FetchFailure>> + Send {
        (**self).get(key)
    }
}

/// Recommendation source backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: reqwest::Client,
    base_url: Option<Url>,
}

impl HttpSource {
    /// Create a source from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &HttpConfig) -> Result<Self, FetchFailure> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self {
            client,
            base_url: config.storefront_url.clone(),
        })
    }

    /// Resolve a request key into an absolute URL.
    ///
    /// Relative keys (e.g. `/recs?...`) are joined onto the storefront URL.
    ///
    /// # Errors
    ///
    /// Returns [`FetchFailure::InvalidUrl`] if the key is relative and no
    /// storefront URL is configured, or if it does not parse.
    pub fn resolve(&self, key: &RequestKey) -> Result<Url, FetchFailure> {
        let invalid = |reason: String| FetchFailure::InvalidUrl {
            url: key.to_string(),
            reason,
        };

        match Url::parse(key.as_str()) {
            Ok(url) => Ok(url),
            Err(url::ParseError::RelativeUrlWithoutBase) => {
                let base = self.base_url.as_ref().ok_or_else(|| {
                    invalid("relative endpoint and no storefront URL configured".to_string())
                })?;
                base.join(key.as_str()).map_err(|e| invalid(e.to_string()))
            }
            Err(e) => Err(invalid(e.to_string())),
        }
    }
}

impl RecommendationSource for HttpSource {
    #[instrument(skip_all, fields(key = %key))]
    async fn get(&self, key: &RequestKey) -> Result<String, FetchFailure> {
        let url = self.resolve(key)?;
        debug!(%url, "Requesting recommendations");

        let response = self
            .client
            .get(url)
            .header(ACCEPT, "text/html")
            .send()
            .await?;

        let status = response.status();

        // Check for rate limiting
        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(FetchFailure::RateLimited(retry_after));
        }

        if !status.is_success() {
            return Err(FetchFailure::Http {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        Ok(response.text().await?)
    }
}
