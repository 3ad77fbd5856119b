//! Integration tests for the HTTP fetcher.

use std::time::Duration;

use emoji_canvas_net::{FetchError, HttpFetcher, HttpFetcherConfig};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_fetch_returns_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/svg/1f600.svg"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"<svg/>".to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = HttpFetcher::new();
    let body = fetcher
        .fetch(&format!("{}/svg/1f600.svg", server.uri()))
        .await
        .expect("fetch should succeed");

    assert_eq!(&body[..], b"<svg/>");
}

#[tokio::test]
async fn test_fetch_maps_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let fetcher = HttpFetcher::new();
    let url = format!("{}/svg/ffff.svg", server.uri());
    let err = fetcher.fetch(&url).await.unwrap_err();

    match err {
        FetchError::HttpStatus { status, url: failed } => {
            assert_eq!(status, 404);
            assert_eq!(failed, url);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_fetch_rejects_invalid_url() {
    let fetcher = HttpFetcher::new();
    let err = fetcher.fetch("no scheme here").await.unwrap_err();
    assert!(matches!(err, FetchError::InvalidUrl(_)));
}

#[tokio::test]
async fn test_fetch_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;

    let config = HttpFetcherConfig::default().with_timeout(Duration::from_millis(100));
    let fetcher = HttpFetcher::with_config(config).expect("Failed to build fetcher");
    let err = fetcher.fetch(&server.uri()).await.unwrap_err();
    assert!(matches!(err, FetchError::Timeout));
}
