//! Integration tests for the HTTP recommendation source.

use cart_upsells::{FetchFailure, RecommendationSource};
use cart_upsells_core::WidgetParameters;
use cart_upsells_integration_tests::{ENDPOINT, http_source, recommendations};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_relative_endpoint_resolves_against_storefront() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(ENDPOINT))
        .and(query_param("product_id", "socks"))
        .and(query_param("section_id", "drawer-upsells"))
        .and(header("accept", "text/html"))
        .respond_with(ResponseTemplate::new(200).set_body_string(recommendations(&["hat"])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let key = WidgetParameters::new("socks", ENDPOINT)
        .with_section_key("drawer-upsells")
        .request_key();
    let body = http_source(&mock_server).get(&key).await;

    assert!(body.is_ok_and(|body| body.contains("/products/hat")));
}

#[tokio::test]
async fn test_absolute_endpoint() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/apps/recs"))
        .respond_with(ResponseTemplate::new(200).set_body_string(recommendations(&["hat"])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let endpoint = format!("{}/apps/recs", mock_server.uri());
    let key = WidgetParameters::new("socks", endpoint).request_key();
    let body = http_source(&mock_server).get(&key).await;

    assert!(body.is_ok());
}

#[tokio::test]
async fn test_rate_limited() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "30"))
        .mount(&mock_server)
        .await;

    let key = WidgetParameters::new("socks", ENDPOINT).request_key();
    let result = http_source(&mock_server).get(&key).await;

    assert!(matches!(result, Err(FetchFailure::RateLimited(30))));
}

#[tokio::test]
async fn test_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let key = WidgetParameters::new("socks", ENDPOINT).request_key();
    let result = http_source(&mock_server).get(&key).await;

    assert!(matches!(
        result,
        Err(FetchFailure::Http { status: 404, ref reason }) if reason == "Not Found"
    ));
}

#[tokio::test]
async fn test_error_reason_ignores_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&mock_server)
        .await;

    let key = WidgetParameters::new("socks", ENDPOINT).request_key();
    let result = http_source(&mock_server).get(&key).await;

    assert!(matches!(
        result,
        Err(FetchFailure::Http { status: 503, ref reason }) if reason == "Service Unavailable"
    ));
}
