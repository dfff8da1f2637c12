//! Common test utilities for in-process API testing with mocks.
//!
//! This module provides a test fixture that builds the router over a
//! provider backed by a mock feed, so the API can be exercised without
//! network access.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use vodo_core::{testing::MockFeedSource, Config, FeedSource, Provider};

/// Re-export fixtures for test convenience
pub use vodo_core::testing::fixtures;

/// Test fixture for API testing with a mock feed.
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_first_page() {
///     let fixture = TestFixture::with_listings(fixtures::numbered_listings(3));
///
///     let response = fixture.get("/api/v1/movies").await;
///
///     assert_eq!(response.status, 200);
/// }
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Mock feed - configure listings and failures
    pub feed: Arc<MockFeedSource>,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestFixture {
    /// Create a fixture over an empty feed.
    pub fn new() -> Self {
        Self::with_feed(MockFeedSource::new())
    }

    /// Create a fixture serving the given listings.
    pub fn with_listings(listings: Vec<vodo_core::RawListing>) -> Self {
        Self::with_feed(MockFeedSource::with_listings(listings))
    }

    /// Create a fixture over a preconfigured mock feed.
    pub fn with_feed(feed: MockFeedSource) -> Self {
        let feed = Arc::new(feed);
        let config = Config::default();
        let provider = Provider::with_feed(
            &config.provider,
            Arc::clone(&feed) as Arc<dyn FeedSource>,
        );
        let state = Arc::new(vodo_server::state::AppState::new(config, provider));
        let router = vodo_server::api::create_router(state);

        Self { router, feed }
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path, None).await
    }

    /// Send a POST request with JSON body.
    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        self.request("POST", path, Some(body)).await
    }

    /// Send a GET request and return the raw body as text.
    pub async fn get_text(&self, path: &str) -> (StatusCode, String) {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())
            .unwrap();

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        (status, String::from_utf8_lossy(&body_bytes).into_owned())
    }

    /// Send a request to the test server.
    async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        let mut request_builder = Request::builder().method(method).uri(path);

        let body = match body {
            Some(json) => {
                request_builder = request_builder.header("Content-Type", "application/json");
                Body::from(serde_json::to_string(&json).unwrap())
            }
            None => Body::empty(),
        };

        let request = request_builder.body(body).unwrap();

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
        };

        TestResponse { status, body }
    }
}
