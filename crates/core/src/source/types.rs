//! Types shared by the source adapters.

use serde::{Deserialize, Serialize};

/// Sentinel release date when the upstream does not know one.
pub const UNKNOWN_DATE: &str = "Unknown";

/// One change item in source-independent form.
///
/// `kind` is open vocabulary: the tracker's issue-type name, or a category
/// inferred from release-note text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedItem {
    pub id: String,
    pub title: String,
    pub kind: String,
}

impl NormalizedItem {
    pub fn new(id: impl Into<String>, title: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            kind: kind.into(),
        }
    }
}

/// Release-level facts used for the document header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseMetadata {
    /// Project key or `owner/repo`.
    pub source_identifier: String,
    /// Name shown in the document title.
    pub display_name: String,
    /// Version as resolved upstream (the fallback tag, when one was used).
    pub version: String,
    /// Release date, or [`UNKNOWN_DATE`].
    pub release_date: String,
    /// Release notes text published with the release record, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl ReleaseMetadata {
    pub fn has_known_date(&self) -> bool {
        self.release_date != UNKNOWN_DATE
    }
}

/// A release as returned by the release host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRelease {
    pub tag_name: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub published_at: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
}

/// Items as handed to the classifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceItems {
    /// Tracker issues, already normalized.
    Issues(Vec<NormalizedItem>),
    /// Free-text release notes, classified line by line.
    ReleaseNotes(String),
}
