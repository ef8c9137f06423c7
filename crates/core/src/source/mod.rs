//! Source adapters for the issue tracker and the release host.
//!
//! Both adapters implement [`SourceAdapter`], so the pipeline only picks one
//! by [`SourceKind`] and never branches on the upstream itself.

mod issue_tracker;
mod release_host;
mod types;

pub use issue_tracker::{IssueTrackerClient, ISSUE_PAGE_SIZE};
pub use release_host::ReleaseHostClient;
pub use types::*;

use async_trait::async_trait;
use reqwest::Response;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::intent::{SourceKind, StructuredIntent};

/// Any failure talking to an upstream source.
///
/// Transport errors, non-2xx statuses and malformed payloads all collapse
/// into one human-readable message. Nothing is retried at this level.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("{0}")]
    Upstream(String),
}

impl FetchError {
    pub fn message(&self) -> &str {
        match self {
            FetchError::Upstream(msg) => msg,
        }
    }

    pub(crate) fn transport(url: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Upstream(format!("request to {} timed out", url))
        } else {
            FetchError::Upstream(format!("request to {} failed: {}", url, err))
        }
    }

    pub(crate) fn status(url: &str, status: reqwest::StatusCode) -> Self {
        FetchError::Upstream(format!(
            "{} {} for url: {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or("Error"),
            url
        ))
    }

    pub(crate) fn malformed(url: &str, detail: impl std::fmt::Display) -> Self {
        FetchError::Upstream(format!("malformed response from {}: {}", url, detail))
    }

    pub(crate) fn wrong_target(adapter: SourceKind, intent: &StructuredIntent) -> Self {
        FetchError::Upstream(format!(
            "{} adapter cannot serve {} target '{}'",
            adapter,
            intent.source(),
            intent.target
        ))
    }
}

/// Capability to fetch one release's metadata and items.
#[async_trait]
pub trait SourceAdapter: Send + Sync {
    /// Which source this adapter answers for.
    fn kind(&self) -> SourceKind;

    /// Fetch release-level metadata. A release without a known date is
    /// not an error: its date is [`UNKNOWN_DATE`].
    async fn fetch_metadata(&self, intent: &StructuredIntent)
        -> Result<ReleaseMetadata, FetchError>;

    /// Fetch the items of the release described by `metadata`.
    async fn fetch_items(
        &self,
        intent: &StructuredIntent,
        metadata: &ReleaseMetadata,
    ) -> Result<SourceItems, FetchError>;
}

/// Check the status and decode a JSON body.
pub(crate) async fn read_json<T: DeserializeOwned>(
    url: &str,
    response: Response,
) -> Result<T, FetchError> {
    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::status(url, status));
    }

    let body = response
        .text()
        .await
        .map_err(|e| FetchError::transport(url, e))?;

    serde_json::from_str(&body).map_err(|e| FetchError::malformed(url, e))
}
