//! Common test utilities for API testing with mocks.
//!
//! This module provides a test fixture that creates an in-process server
//! with mock dependencies injected, so API tests run without an LLM, an
//! issue tracker or a release host.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use relnotes_core::testing::{
    FixedIntentExtractor, MemoryArtifactStore, MockGuardrail, MockRenderBackend, MockSourceAdapter,
};
use relnotes_core::{Config, ReleaseNotesPipeline, SourceKind};
use relnotes_server::state::AppState;

/// Re-export fixtures for test convenience
pub use relnotes_core::testing::fixtures;

/// Test fixture for API testing with mock dependencies.
///
/// Provides an in-process router with fully controllable mocks for:
/// - Intent extraction (FixedIntentExtractor)
/// - Guardrail (MockGuardrail)
/// - Both source adapters (MockSourceAdapter)
/// - Document storage (MemoryArtifactStore)
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_query() {
///     let fixture = TestFixture::new();
///
///     let response = fixture.post("/api/v1/query", json!({
///         "message": "release notes for ZOOKEEPER 3.9.0"
///     })).await;
///
///     assert_eq!(response.status, StatusCode::OK);
/// }
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    pub extractor: FixedIntentExtractor,
    pub guardrail: MockGuardrail,
    pub tracker: MockSourceAdapter,
    pub host: MockSourceAdapter,
    pub store: MemoryArtifactStore,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
    pub body: Value,
}

impl TestFixture {
    /// Fixture whose extractor answers with the ZooKeeper tracker intent.
    pub fn new() -> Self {
        Self::with_extractor(FixedIntentExtractor::returning(fixtures::zookeeper_intent()))
    }

    pub fn with_extractor(extractor: FixedIntentExtractor) -> Self {
        let guardrail = MockGuardrail::new();
        let tracker = MockSourceAdapter::new(SourceKind::IssueTracker);
        let host = MockSourceAdapter::new(SourceKind::ReleaseHost);
        let store = MemoryArtifactStore::new();

        let pipeline = ReleaseNotesPipeline::new(
            Arc::new(extractor.clone()),
            Arc::new(MockRenderBackend::new()),
            Arc::new(store.clone()),
        )
        .with_guardrail(Arc::new(guardrail.clone()))
        .with_adapter(Arc::new(tracker.clone()))
        .with_adapter(Arc::new(host.clone()));

        let state = Arc::new(AppState::new(Config::default(), pipeline));
        let router = relnotes_server::api::create_router(state);

        Self {
            router,
            extractor,
            guardrail,
            tracker,
            host,
            store,
        }
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path, None).await
    }

    /// Send a POST request with JSON body.
    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        self.request("POST", path, Some(body)).await
    }

    /// Send a POST request with raw string body (for testing malformed JSON).
    pub async fn post_raw(&self, path: &str, body: &str) -> TestResponse {
        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        let mut request_builder = Request::builder().method(method).uri(path);

        let body = if let Some(json_body) = body {
            request_builder = request_builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(serde_json::to_vec(&json_body).unwrap())
        } else {
            Body::empty()
        };

        self.send(request_builder.body(body).unwrap()).await
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes()
            .to_vec();

        let body: Value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        TestResponse {
            status,
            content_type,
            bytes,
            body,
        }
    }
}

/// Helper to assert a response has expected status.
#[macro_export]
macro_rules! assert_status {
    ($response:expr, $status:expr) => {
        assert_eq!(
            $response.status, $status,
            "Expected status {:?}, got {:?}. Body: {}",
            $status,
            $response.status,
            serde_json::to_string_pretty(&$response.body).unwrap_or_default()
        );
    };
}
