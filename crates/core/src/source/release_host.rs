//! Release host (GitHub REST) adapter.
//!
//! A release is looked up by tag. When the exact tag is missing and the
//! requested version has no `v` prefix, the lookup is retried once with
//! `v` prepended. Metadata and notes come from the same release record.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::{debug, info};

use crate::config::ReleaseHostConfig;
use crate::intent::{ReleaseTarget, SourceKind, StructuredIntent};
use crate::metrics::{record_upstream, TAG_FALLBACKS};

use super::types::{RawRelease, ReleaseMetadata, SourceItems, UNKNOWN_DATE};
use super::{read_json, FetchError, SourceAdapter};

const ACCEPT_HEADER: &str = "application/vnd.github+json";

/// GitHub releases client.
pub struct ReleaseHostClient {
    client: Client,
    base_url: String,
}

impl ReleaseHostClient {
    pub fn new(config: &ReleaseHostConfig) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_HEADER));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .map_err(|e| FetchError::Upstream(format!("invalid user agent: {}", e)))?,
        );
        if let Some(token) = config.token.as_deref().filter(|t| !t.is_empty()) {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|e| FetchError::Upstream(format!("invalid release host token: {}", e)))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()
            .map_err(|e| FetchError::Upstream(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch the release tagged `version`, falling back to `v{version}` once.
    ///
    /// The returned record's `tag_name` is the tag the host resolved, so a
    /// successful fallback is visible to callers.
    pub async fn fetch_release(
        &self,
        owner: &str,
        repo: &str,
        version: &str,
    ) -> Result<RawRelease, FetchError> {
        match self.fetch_tag(owner, repo, version).await? {
            Some(release) => Ok(release),
            None if !version.starts_with('v') => {
                let tag = format!("v{}", version);
                info!(
                    "Release tag '{}' not found for {}/{}, retrying with '{}'",
                    version, owner, repo, tag
                );
                TAG_FALLBACKS.inc();
                match self.fetch_tag(owner, repo, &tag).await? {
                    Some(release) => Ok(release),
                    None => Err(FetchError::status(
                        &self.release_url(owner, repo, &tag),
                        StatusCode::NOT_FOUND,
                    )),
                }
            }
            None => Err(FetchError::status(
                &self.release_url(owner, repo, version),
                StatusCode::NOT_FOUND,
            )),
        }
    }

    /// One tag lookup. `Ok(None)` means the host answered 404.
    async fn fetch_tag(
        &self,
        owner: &str,
        repo: &str,
        tag: &str,
    ) -> Result<Option<RawRelease>, FetchError> {
        let url = self.release_url(owner, repo, tag);
        debug!("Release lookup: url='{}'", url);

        let response = self.client.get(&url).send().await.map_err(|e| {
            record_upstream(SourceKind::ReleaseHost.as_str(), "release", false);
            FetchError::transport(&url, e)
        })?;

        if response.status() == StatusCode::NOT_FOUND {
            record_upstream(SourceKind::ReleaseHost.as_str(), "release", false);
            return Ok(None);
        }

        let result = read_json::<RawReleaseBody>(&url, response).await;
        record_upstream(SourceKind::ReleaseHost.as_str(), "release", result.is_ok());
        let body = result?;

        Ok(Some(RawRelease {
            tag_name: body
                .tag_name
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| tag.to_string()),
            name: body.name,
            published_at: body.published_at,
            body: body.body,
        }))
    }

    fn release_url(&self, owner: &str, repo: &str, tag: &str) -> String {
        format!(
            "{}/repos/{}/{}/releases/tags/{}",
            self.base_url,
            urlencoding::encode(owner),
            urlencoding::encode(repo),
            urlencoding::encode(tag)
        )
    }

    fn repository(intent: &StructuredIntent) -> Result<(&str, &str), FetchError> {
        match &intent.target {
            ReleaseTarget::Repository { owner, repo } => Ok((owner, repo)),
            ReleaseTarget::Project { .. } => {
                Err(FetchError::wrong_target(SourceKind::ReleaseHost, intent))
            }
        }
    }
}

/// Build header metadata from a release record.
pub(crate) fn release_metadata(owner: &str, repo: &str, release: RawRelease) -> ReleaseMetadata {
    ReleaseMetadata {
        source_identifier: format!("{}/{}", owner, repo),
        display_name: repo.to_uppercase(),
        version: release.tag_name,
        release_date: release
            .published_at
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| UNKNOWN_DATE.to_string()),
        notes: release.body,
    }
}

#[async_trait]
impl SourceAdapter for ReleaseHostClient {
    fn kind(&self) -> SourceKind {
        SourceKind::ReleaseHost
    }

    async fn fetch_metadata(
        &self,
        intent: &StructuredIntent,
    ) -> Result<ReleaseMetadata, FetchError> {
        let (owner, repo) = Self::repository(intent)?;
        let release = self.fetch_release(owner, repo, &intent.version).await?;
        Ok(release_metadata(owner, repo, release))
    }

    /// Notes were already fetched with the metadata; no second request.
    async fn fetch_items(
        &self,
        intent: &StructuredIntent,
        metadata: &ReleaseMetadata,
    ) -> Result<SourceItems, FetchError> {
        Self::repository(intent)?;
        Ok(SourceItems::ReleaseNotes(
            metadata.notes.clone().unwrap_or_default(),
        ))
    }
}

#[derive(Debug, serde::Deserialize)]
struct RawReleaseBody {
    #[serde(default)]
    tag_name: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    published_at: Option<String>,
    #[serde(default)]
    body: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_release_metadata_uppercases_repo() {
        let release = RawRelease {
            tag_name: "v3.9.0".to_string(),
            name: None,
            published_at: Some("2023-08-01T00:00:00Z".to_string()),
            body: Some("* Fix crash".to_string()),
        };
        let metadata = release_metadata("apache", "zookeeper", release);
        assert_eq!(metadata.source_identifier, "apache/zookeeper");
        assert_eq!(metadata.display_name, "ZOOKEEPER");
        assert_eq!(metadata.version, "v3.9.0");
        assert_eq!(metadata.release_date, "2023-08-01T00:00:00Z");
        assert_eq!(metadata.notes.as_deref(), Some("* Fix crash"));
    }

    #[test]
    fn test_release_metadata_without_date() {
        let release = RawRelease {
            tag_name: "1.0".to_string(),
            name: None,
            published_at: None,
            body: None,
        };
        let metadata = release_metadata("o", "r", release);
        assert_eq!(metadata.release_date, UNKNOWN_DATE);
        assert!(!metadata.has_known_date());
    }

    #[tokio::test]
    async fn test_items_come_from_metadata_notes() {
        let client = ReleaseHostClient::new(&ReleaseHostConfig::default()).unwrap();
        let intent = StructuredIntent::release_host("o", "r", "1.0");
        let metadata = ReleaseMetadata {
            source_identifier: "o/r".to_string(),
            display_name: "R".to_string(),
            version: "1.0".to_string(),
            release_date: UNKNOWN_DATE.to_string(),
            notes: Some("- Add widgets".to_string()),
        };
        let items = client.fetch_items(&intent, &metadata).await.unwrap();
        assert_eq!(items, SourceItems::ReleaseNotes("- Add widgets".to_string()));
    }

    #[test]
    fn test_invalid_token_is_rejected() {
        let config = ReleaseHostConfig {
            token: Some("bad\ntoken".to_string()),
            ..Default::default()
        };
        assert!(ReleaseHostClient::new(&config).is_err());
    }
}
