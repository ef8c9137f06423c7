//! Release notes document composition.
//!
//! The composed [`Document`] is the only contract between classification and
//! rendering: a small markdown subset with `#`/`##` headings, `- ` list items,
//! body lines, blank-line breaks and `**emphasis**`.

use crate::classify::CategorizedResult;
use crate::intent::SourceKind;

/// Markdown-like release notes text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document(String);

impl Document {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn lines(&self) -> std::str::Lines<'_> {
        self.0.lines()
    }
}

impl std::fmt::Display for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Label of the summary total, which differs per source.
fn total_label(source: SourceKind) -> &'static str {
    match source {
        SourceKind::IssueTracker => "Total Issues",
        SourceKind::ReleaseHost => "Total Items",
    }
}

/// Compose the release notes document. Pure and deterministic.
pub fn compose(result: &CategorizedResult) -> Document {
    let metadata = &result.metadata;
    let mut out = String::new();

    out.push_str(&format!(
        "# {} Release {}\n\n",
        metadata.display_name, metadata.version
    ));

    out.push_str("## Release Date\n");
    out.push_str(&format!("{}\n\n", metadata.release_date));

    out.push_str("## Summary\n");
    out.push_str(&format!(
        "- **{}**: {}\n",
        total_label(result.source),
        result.total_items()
    ));
    for category in &result.categories {
        out.push_str(&format!("- **{}**: {}\n", category.name, category.len()));
    }
    out.push('\n');

    for category in result.categories.iter().filter(|c| !c.is_empty()) {
        out.push_str(&format!("## {}\n", category.name));
        for line in &category.lines {
            out.push_str(&format!("- {}\n", line));
        }
        out.push('\n');
    }

    Document(out)
}
