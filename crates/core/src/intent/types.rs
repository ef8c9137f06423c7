//! Structured intent types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which upstream system a request is answered from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Issue tracker (JIRA): items are issues with a fix version.
    IssueTracker,
    /// Release host (GitHub): items are lines of a tagged release's notes.
    ReleaseHost,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::IssueTracker => "issue_tracker",
            SourceKind::ReleaseHost => "release_host",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the notes are about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReleaseTarget {
    /// Issue tracker project key (canonical upper case).
    Project { key: String },
    /// Release host repository.
    Repository { owner: String, repo: String },
}

impl ReleaseTarget {
    pub fn source(&self) -> SourceKind {
        match self {
            ReleaseTarget::Project { .. } => SourceKind::IssueTracker,
            ReleaseTarget::Repository { .. } => SourceKind::ReleaseHost,
        }
    }
}

impl fmt::Display for ReleaseTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReleaseTarget::Project { key } => f.write_str(key),
            ReleaseTarget::Repository { owner, repo } => write!(f, "{}/{}", owner, repo),
        }
    }
}

/// A request reduced to a target and a version. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredIntent {
    pub target: ReleaseTarget,
    pub version: String,
}

impl StructuredIntent {
    /// Issue tracker intent; the project key is upper-cased.
    pub fn issue_tracker(project: &str, version: &str) -> Self {
        Self {
            target: ReleaseTarget::Project {
                key: project.trim().to_uppercase(),
            },
            version: version.trim().to_string(),
        }
    }

    /// Release host intent. Owner and repo are trimmed but keep their case.
    pub fn release_host(owner: &str, repo: &str, version: &str) -> Self {
        Self {
            target: ReleaseTarget::Repository {
                owner: owner.trim().to_string(),
                repo: repo.trim().to_string(),
            },
            version: version.trim().to_string(),
        }
    }

    pub fn source(&self) -> SourceKind {
        self.target.source()
    }
}
