//! Issue tracker (JIRA REST v2) adapter.
//!
//! Items come from a single JQL search limited to the first
//! [`ISSUE_PAGE_SIZE`] results; there is no follow-up pagination, so larger
//! releases are truncated. Metadata comes from the project's version list.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::IssueTrackerConfig;
use crate::intent::{ReleaseTarget, SourceKind, StructuredIntent};
use crate::metrics::record_upstream;

use super::types::{NormalizedItem, ReleaseMetadata, SourceItems, UNKNOWN_DATE};
use super::{read_json, FetchError, SourceAdapter};

/// Fixed search window. Issues beyond it are not fetched.
pub const ISSUE_PAGE_SIZE: u32 = 50;

const SEARCH_FIELDS: &str = "summary,issuetype";

/// JIRA REST client.
pub struct IssueTrackerClient {
    client: Client,
    base_url: String,
}

impl IssueTrackerClient {
    pub fn new(config: &IssueTrackerConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()
            .map_err(|e| FetchError::Upstream(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch the issues whose fix version is `version`.
    pub async fn fetch_items(
        &self,
        project: &str,
        version: &str,
    ) -> Result<Vec<NormalizedItem>, FetchError> {
        let url = format!("{}/rest/api/2/search", self.base_url);
        let jql = format!("project = {} AND fixVersion = {}", project, version);
        let page_size = ISSUE_PAGE_SIZE.to_string();

        debug!("Issue search: jql='{}'", jql);

        let result = async {
            let response = self
                .client
                .get(&url)
                .query(&[
                    ("jql", jql.as_str()),
                    ("fields", SEARCH_FIELDS),
                    ("startAt", "0"),
                    ("maxResults", page_size.as_str()),
                ])
                .send()
                .await
                .map_err(|e| FetchError::transport(&url, e))?;

            read_json::<SearchResponse>(&url, response).await
        }
        .await;
        record_upstream(SourceKind::IssueTracker.as_str(), "search", result.is_ok());
        let search = result?;

        if let Some(total) = search.total {
            if total as usize > search.issues.len() {
                warn!(
                    project,
                    version,
                    total,
                    fetched = search.issues.len(),
                    "Issue search truncated to the first page"
                );
            }
        }

        Ok(search.issues.into_iter().map(NormalizedItem::from).collect())
    }

    /// Look up the release date of `version` in the project's version list.
    pub async fn fetch_metadata(
        &self,
        project: &str,
        version: &str,
    ) -> Result<ReleaseMetadata, FetchError> {
        let url = format!(
            "{}/rest/api/2/project/{}/versions",
            self.base_url,
            urlencoding::encode(project)
        );

        debug!("Version lookup: project='{}', version='{}'", project, version);

        let result = async {
            let response = self
                .client
                .get(&url)
                .send()
                .await
                .map_err(|e| FetchError::transport(&url, e))?;

            read_json::<Vec<ProjectVersion>>(&url, response).await
        }
        .await;
        record_upstream(SourceKind::IssueTracker.as_str(), "versions", result.is_ok());
        let versions = result?;

        let release_date = versions
            .into_iter()
            .find(|v| v.name == version)
            .and_then(|v| v.release_date)
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| UNKNOWN_DATE.to_string());

        Ok(ReleaseMetadata {
            source_identifier: project.to_string(),
            display_name: project.to_string(),
            version: version.to_string(),
            release_date,
            notes: None,
        })
    }

    fn project_key(intent: &StructuredIntent) -> Result<&str, FetchError> {
        match &intent.target {
            ReleaseTarget::Project { key } => Ok(key),
            ReleaseTarget::Repository { .. } => {
                Err(FetchError::wrong_target(SourceKind::IssueTracker, intent))
            }
        }
    }
}

#[async_trait]
impl SourceAdapter for IssueTrackerClient {
    fn kind(&self) -> SourceKind {
        SourceKind::IssueTracker
    }

    async fn fetch_metadata(
        &self,
        intent: &StructuredIntent,
    ) -> Result<ReleaseMetadata, FetchError> {
        let project = Self::project_key(intent)?;
        IssueTrackerClient::fetch_metadata(self, project, &intent.version).await
    }

    async fn fetch_items(
        &self,
        intent: &StructuredIntent,
        _metadata: &ReleaseMetadata,
    ) -> Result<SourceItems, FetchError> {
        let project = Self::project_key(intent)?;
        let issues = IssueTrackerClient::fetch_items(self, project, &intent.version).await?;
        Ok(SourceItems::Issues(issues))
    }
}

// ============================================================================
// JIRA API Response Types (private)
// ============================================================================

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    total: Option<u64>,
    #[serde(default)]
    issues: Vec<Issue>,
}

#[derive(Debug, Deserialize)]
struct Issue {
    #[serde(default)]
    key: String,
    #[serde(default)]
    fields: IssueFields,
}

#[derive(Debug, Default, Deserialize)]
struct IssueFields {
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    issuetype: Option<IssueType>,
}

#[derive(Debug, Deserialize)]
struct IssueType {
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProjectVersion {
    #[serde(default)]
    name: String,
    #[serde(default, rename = "releaseDate")]
    release_date: Option<String>,
}

impl From<Issue> for NormalizedItem {
    fn from(issue: Issue) -> Self {
        NormalizedItem {
            id: issue.key,
            title: issue.fields.summary.unwrap_or_default(),
            kind: issue
                .fields
                .issuetype
                .and_then(|t| t.name)
                .unwrap_or_default(),
        }
    }
}
