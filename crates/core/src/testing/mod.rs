//! Testing utilities and mock implementations.
//!
//! Every capability the pipeline depends on has a controllable fake here, so
//! pipeline and API tests run without an LLM, a tracker or a release host.
//!
//! # Example
//!
//! ```rust,ignore
//! use relnotes_core::testing::{fixtures, FixedIntentExtractor, MemoryArtifactStore, MockSourceAdapter};
//!
//! let adapter = MockSourceAdapter::new(SourceKind::IssueTracker);
//! adapter.set_items(SourceItems::Issues(fixtures::zookeeper_issues())).await;
//! let extractor = FixedIntentExtractor::returning(fixtures::zookeeper_intent());
//! let store = MemoryArtifactStore::new();
//!
//! // Build a ReleaseNotesPipeline from them...
//! ```

mod memory_store;
mod mock_guardrail;
mod mock_intent;
mod mock_render;
mod mock_source;

pub use memory_store::MemoryArtifactStore;
pub use mock_guardrail::MockGuardrail;
pub use mock_intent::FixedIntentExtractor;
pub use mock_render::MockRenderBackend;
pub use mock_source::{FetchOperation, MockSourceAdapter, RecordedFetch};

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::intent::{ReleaseTarget, StructuredIntent};
    use crate::source::{NormalizedItem, RawRelease, ReleaseMetadata, UNKNOWN_DATE};

    /// Intent for ZooKeeper 3.9.0 on the issue tracker.
    pub fn zookeeper_intent() -> StructuredIntent {
        StructuredIntent::issue_tracker("ZOOKEEPER", "3.9.0")
    }

    /// Intent for apache/zookeeper 3.9.0 on the release host.
    pub fn zookeeper_repo_intent() -> StructuredIntent {
        StructuredIntent::release_host("apache", "zookeeper", "3.9.0")
    }

    /// Create a normalized issue.
    pub fn issue(id: &str, title: &str, kind: &str) -> NormalizedItem {
        NormalizedItem::new(id, title, kind)
    }

    /// A small mixed set of tracker issues.
    pub fn zookeeper_issues() -> Vec<NormalizedItem> {
        vec![
            issue("ZOOKEEPER-4700", "Fix leak in session tracker", "Bug"),
            issue("ZOOKEEPER-4701", "Add TLS hot reload", "New Feature"),
            issue("ZOOKEEPER-4702", "Speed up snapshot loading", "Improvement"),
            issue("ZOOKEEPER-4703", "NPE on shutdown", "Bug"),
        ]
    }

    /// Release notes body in the host's usual markdown.
    pub fn release_body() -> String {
        "## What's Changed\n\
         * Add metrics endpoint by @dev in https://github.com/apache/zookeeper/pull/1\n\
         * Fix race in leader election\n\
         * Improve `zkCli` help output\n\
         * Bump netty to 4.1.100\n\
         \n\
         **Full Changelog**: https://github.com/apache/zookeeper/compare/v3.8.0...v3.9.0\n"
            .to_string()
    }

    /// A release record as the host would return it.
    pub fn raw_release(tag: &str) -> RawRelease {
        RawRelease {
            tag_name: tag.to_string(),
            name: Some(format!("Release {}", tag)),
            published_at: Some("2023-08-01T12:00:00Z".to_string()),
            body: Some(release_body()),
        }
    }

    /// Metadata an adapter would report for `intent`, with an unknown date.
    pub fn metadata_for(intent: &StructuredIntent) -> ReleaseMetadata {
        let (source_identifier, display_name) = match &intent.target {
            ReleaseTarget::Project { key } => (key.clone(), key.clone()),
            ReleaseTarget::Repository { owner, repo } => {
                (format!("{}/{}", owner, repo), repo.to_uppercase())
            }
        };
        ReleaseMetadata {
            source_identifier,
            display_name,
            version: intent.version.clone(),
            release_date: UNKNOWN_DATE.to_string(),
            notes: None,
        }
    }

    /// Issue-tracker search response body, as JSON.
    pub fn search_response_json(issues: &[NormalizedItem]) -> serde_json::Value {
        serde_json::json!({
            "startAt": 0,
            "maxResults": 50,
            "total": issues.len(),
            "issues": issues
                .iter()
                .map(|i| serde_json::json!({
                    "key": i.id,
                    "fields": {
                        "summary": i.title,
                        "issuetype": { "name": i.kind },
                    },
                }))
                .collect::<Vec<_>>(),
        })
    }

    /// Release host release response body, as JSON.
    pub fn release_json(release: &RawRelease) -> serde_json::Value {
        serde_json::json!({
            "tag_name": release.tag_name,
            "name": release.name,
            "published_at": release.published_at,
            "body": release.body,
        })
    }
}
