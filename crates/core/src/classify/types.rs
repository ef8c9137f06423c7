//! Types for the classify module.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::intent::SourceKind;
use crate::source::ReleaseMetadata;

/// Closed category set for release-host notes, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ReleaseCategory {
    Features,
    BugFixes,
    Improvements,
    Others,
}

impl ReleaseCategory {
    /// All categories, in the order they are displayed.
    pub const DISPLAY_ORDER: [ReleaseCategory; 4] = [
        ReleaseCategory::Features,
        ReleaseCategory::BugFixes,
        ReleaseCategory::Improvements,
        ReleaseCategory::Others,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReleaseCategory::Features => "Features",
            ReleaseCategory::BugFixes => "Bug Fixes",
            ReleaseCategory::Improvements => "Improvements",
            ReleaseCategory::Others => "Others",
        }
    }
}

impl fmt::Display for ReleaseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One named category and its formatted lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    pub lines: Vec<String>,
}

impl Category {
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Items grouped into ordered, non-empty categories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorizedResult {
    pub metadata: ReleaseMetadata,
    /// Which source the items came from. Drives the summary wording.
    pub source: SourceKind,
    /// Categories in display order.
    pub categories: Vec<Category>,
}

impl CategorizedResult {
    /// Number of classified items across all categories.
    pub fn total_items(&self) -> usize {
        self.categories.iter().map(Category::len).sum()
    }

    /// Lines of a category by name.
    pub fn category(&self, name: &str) -> Option<&[String]> {
        self.categories
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.lines.as_slice())
    }

    pub fn category_names(&self) -> Vec<&str> {
        self.categories.iter().map(|c| c.name.as_str()).collect()
    }
}

/// Errors raised while classifying items.
#[derive(Debug, Error)]
pub enum ClassificationError {
    /// An issue came back without an identifier.
    #[error("issue at position {index} has no id (title: '{title}')")]
    MissingId { index: usize, title: String },
}
