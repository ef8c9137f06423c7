//! Source adapter integration tests against mock HTTP servers.
//!
//! These tests verify:
//! - Issue tracker search and version lookup requests
//! - Unknown release dates
//! - Release host `v`-prefix tag fallback
//! - Authentication and content negotiation headers
//! - Upstream failures mapped to a single readable error

use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use relnotes_core::config::{IssueTrackerConfig, ReleaseHostConfig};
use relnotes_core::source::ISSUE_PAGE_SIZE;
use relnotes_core::testing::fixtures;
use relnotes_core::{
    IssueTrackerClient, ReleaseHostClient, SourceAdapter, SourceItems, StructuredIntent,
};

fn tracker(server: &MockServer) -> IssueTrackerClient {
    IssueTrackerClient::new(&IssueTrackerConfig {
        base_url: server.uri(),
        timeout_secs: 5,
    })
    .unwrap()
}

fn host(server: &MockServer, token: Option<&str>) -> ReleaseHostClient {
    ReleaseHostClient::new(&ReleaseHostConfig {
        base_url: server.uri(),
        token: token.map(str::to_string),
        timeout_secs: 5,
        user_agent: "relnotes-test".to_string(),
    })
    .unwrap()
}

// =============================================================================
// Issue tracker
// =============================================================================

#[tokio::test]
async fn test_issue_search_sends_fixed_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/api/2/search"))
        .and(query_param("jql", "project = ZOOKEEPER AND fixVersion = 3.9.0"))
        .and(query_param("fields", "summary,issuetype"))
        .and(query_param("startAt", "0"))
        .and(query_param("maxResults", ISSUE_PAGE_SIZE.to_string()))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(fixtures::search_response_json(&fixtures::zookeeper_issues())),
        )
        .expect(1)
        .mount(&server)
        .await;

    let issues = tracker(&server)
        .fetch_items("ZOOKEEPER", "3.9.0")
        .await
        .unwrap();

    assert_eq!(issues, fixtures::zookeeper_issues());
}

#[tokio::test]
async fn test_issue_search_tolerates_missing_fields() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/api/2/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "issues": [
                {"key": "KAFKA-1", "fields": {"summary": "No type"}},
                {"key": "KAFKA-2", "fields": {"issuetype": {"name": "Bug"}}}
            ]
        })))
        .mount(&server)
        .await;

    let issues = tracker(&server).fetch_items("KAFKA", "3.6.0").await.unwrap();

    assert_eq!(issues.len(), 2);
    assert_eq!(issues[0].kind, "");
    assert_eq!(issues[1].title, "");
}

#[tokio::test]
async fn test_issue_search_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/api/2/search"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let err = tracker(&server)
        .fetch_items("ZOOKEEPER", "3.9.0")
        .await
        .unwrap_err();

    assert!(err.message().starts_with("500 Internal Server Error for url: "));
}

#[tokio::test]
async fn test_issue_search_malformed_payload() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/api/2/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let err = tracker(&server)
        .fetch_items("ZOOKEEPER", "3.9.0")
        .await
        .unwrap_err();

    assert!(err.message().contains("malformed response"));
}

#[tokio::test]
async fn test_version_lookup_exact_match() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/api/2/project/ZOOKEEPER/versions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"name": "3.9.0-beta", "releaseDate": "2023-01-01"},
            {"name": "3.9.0", "releaseDate": "2023-08-03"},
        ])))
        .mount(&server)
        .await;

    let metadata = tracker(&server)
        .fetch_metadata("ZOOKEEPER", "3.9.0")
        .await
        .unwrap();

    assert_eq!(metadata.release_date, "2023-08-03");
    assert_eq!(metadata.display_name, "ZOOKEEPER");
    assert_eq!(metadata.version, "3.9.0");
}

#[tokio::test]
async fn test_version_lookup_unknown_when_absent_or_undated() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/api/2/project/ZOOKEEPER/versions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"name": "3.8.0", "releaseDate": "2022-03-01"},
            {"name": "3.10.0"},
        ])))
        .mount(&server)
        .await;

    let client = tracker(&server);
    let absent = client.fetch_metadata("ZOOKEEPER", "3.9.0").await.unwrap();
    let undated = client.fetch_metadata("ZOOKEEPER", "3.10.0").await.unwrap();

    assert_eq!(absent.release_date, "Unknown");
    assert_eq!(undated.release_date, "Unknown");
}

#[tokio::test]
async fn test_issue_tracker_adapter_returns_issue_items() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/api/2/search"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(fixtures::search_response_json(&fixtures::zookeeper_issues())),
        )
        .mount(&server)
        .await;

    let intent = fixtures::zookeeper_intent();
    let client = tracker(&server);
    let items = SourceAdapter::fetch_items(&client, &intent, &fixtures::metadata_for(&intent))
        .await
        .unwrap();

    assert_eq!(items, SourceItems::Issues(fixtures::zookeeper_issues()));
}

// =============================================================================
// Release host
// =============================================================================

#[tokio::test]
async fn test_release_exact_tag() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/apache/zookeeper/releases/tags/3.9.0"))
        .and(header("accept", "application/vnd.github+json"))
        .and(header("user-agent", "relnotes-test"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(fixtures::release_json(&fixtures::raw_release("3.9.0"))),
        )
        .expect(1)
        .mount(&server)
        .await;

    let release = host(&server, None)
        .fetch_release("apache", "zookeeper", "3.9.0")
        .await
        .unwrap();

    assert_eq!(release.tag_name, "3.9.0");
    assert_eq!(release.body.as_deref(), Some(fixtures::release_body().as_str()));
}

#[tokio::test]
async fn test_release_falls_back_to_v_prefix_once() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/apache/zookeeper/releases/tags/3.9.0"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "Not Found"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/repos/apache/zookeeper/releases/tags/v3.9.0"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(fixtures::release_json(&fixtures::raw_release("v3.9.0"))),
        )
        .expect(1)
        .mount(&server)
        .await;

    let intent = fixtures::zookeeper_repo_intent();
    let metadata = SourceAdapter::fetch_metadata(&host(&server, None), &intent)
        .await
        .unwrap();

    assert_eq!(metadata.version, "v3.9.0");
    assert_eq!(metadata.display_name, "ZOOKEEPER");
    assert_eq!(metadata.source_identifier, "apache/zookeeper");
    assert_eq!(metadata.release_date, "2023-08-01T12:00:00Z");
}

#[tokio::test]
async fn test_release_no_fallback_when_already_prefixed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/apache/zookeeper/releases/tags/v3.9.0"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/repos/apache/zookeeper/releases/tags/vv3.9.0"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = host(&server, None)
        .fetch_release("apache", "zookeeper", "v3.9.0")
        .await
        .unwrap_err();

    assert!(err.message().starts_with("404 Not Found"));
}

#[tokio::test]
async fn test_release_fallback_also_missing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .expect(2)
        .mount(&server)
        .await;

    let err = host(&server, None)
        .fetch_release("apache", "zookeeper", "9.9.9")
        .await
        .unwrap_err();

    assert!(err.message().contains("/releases/tags/v9.9.9"));
}

#[tokio::test]
async fn test_release_server_error_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(502))
        .expect(1)
        .mount(&server)
        .await;

    let err = host(&server, None)
        .fetch_release("apache", "zookeeper", "3.9.0")
        .await
        .unwrap_err();

    assert!(err.message().starts_with("502 Bad Gateway"));
}

#[tokio::test]
async fn test_release_sends_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(header("authorization", "Bearer ghp_test"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(fixtures::release_json(&fixtures::raw_release("1.0.0"))),
        )
        .expect(1)
        .mount(&server)
        .await;

    host(&server, Some("ghp_test"))
        .fetch_release("o", "r", "1.0.0")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_release_without_body_has_no_items() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"tag_name": "1.0.0"})))
        .mount(&server)
        .await;

    let client = host(&server, None);
    let intent = StructuredIntent::release_host("o", "r", "1.0.0");
    let metadata = SourceAdapter::fetch_metadata(&client, &intent).await.unwrap();
    let items = SourceAdapter::fetch_items(&client, &intent, &metadata)
        .await
        .unwrap();

    assert_eq!(metadata.release_date, "Unknown");
    assert_eq!(items, SourceItems::ReleaseNotes(String::new()));
}
