//! Grouping of normalized items into named, ordered categories.
//!
//! Issue-tracker items are keyed by their issue type (open vocabulary, sorted
//! by name). Release-host notes are split into lines and sorted into a closed
//! set of categories by keyword rules.

mod rules;
mod types;

pub use rules::{clean_line, infer_category};
pub use types::{CategorizedResult, Category, ClassificationError, ReleaseCategory};

use std::collections::BTreeMap;
use tracing::debug;

use crate::intent::SourceKind;
use crate::source::{NormalizedItem, ReleaseMetadata, SourceItems};

/// Reported kind for issues whose type is missing.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Classify fetched items, dispatching on their shape.
pub fn classify(
    metadata: ReleaseMetadata,
    items: SourceItems,
) -> Result<CategorizedResult, ClassificationError> {
    match items {
        SourceItems::Issues(issues) => classify_issues(metadata, &issues),
        SourceItems::ReleaseNotes(body) => Ok(classify_release_notes(metadata, &body)),
    }
}

/// Group tracker issues by kind. Lines read `"{id}: {title}"`.
pub fn classify_issues(
    metadata: ReleaseMetadata,
    issues: &[NormalizedItem],
) -> Result<CategorizedResult, ClassificationError> {
    let mut grouped: BTreeMap<String, Vec<String>> = BTreeMap::new();

    for (index, issue) in issues.iter().enumerate() {
        if issue.id.trim().is_empty() {
            return Err(ClassificationError::MissingId {
                index,
                title: issue.title.clone(),
            });
        }

        let kind = if issue.kind.trim().is_empty() {
            UNCATEGORIZED.to_string()
        } else {
            issue.kind.clone()
        };

        grouped
            .entry(kind)
            .or_default()
            .push(format!("{}: {}", issue.id, issue.title));
    }

    debug!(
        "Classified {} issues into {} kinds",
        issues.len(),
        grouped.len()
    );

    Ok(CategorizedResult {
        metadata,
        source: SourceKind::IssueTracker,
        categories: grouped
            .into_iter()
            .map(|(name, lines)| Category { name, lines })
            .collect(),
    })
}

/// Split release notes into cleaned lines and sort them by keyword.
///
/// Lines that clean to nothing are dropped before counting.
pub fn classify_release_notes(metadata: ReleaseMetadata, body: &str) -> CategorizedResult {
    let mut grouped: BTreeMap<ReleaseCategory, Vec<String>> = BTreeMap::new();

    for line in body.lines().map(clean_line).filter(|l| !l.is_empty()) {
        grouped.entry(infer_category(&line)).or_default().push(line);
    }

    let categories = ReleaseCategory::DISPLAY_ORDER
        .iter()
        .filter_map(|category| {
            grouped.remove(category).map(|lines| Category {
                name: category.to_string(),
                lines,
            })
        })
        .collect::<Vec<_>>();

    debug!(
        "Classified release notes into {} categories",
        categories.len()
    );

    CategorizedResult {
        metadata,
        source: SourceKind::ReleaseHost,
        categories,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::UNKNOWN_DATE;

    fn metadata() -> ReleaseMetadata {
        ReleaseMetadata {
            source_identifier: "ZOOKEEPER".to_string(),
            display_name: "ZOOKEEPER".to_string(),
            version: "3.9.0".to_string(),
            release_date: UNKNOWN_DATE.to_string(),
            notes: None,
        }
    }

    #[test]
    fn test_issue_keys_are_sorted_distinct_kinds() {
        let issues = vec![
            NormalizedItem::new("ZK-3", "Speed up", "Improvement"),
            NormalizedItem::new("ZK-1", "Crash", "Bug"),
            NormalizedItem::new("ZK-2", "Leak", "Bug"),
            NormalizedItem::new("ZK-4", "Docs", "Task"),
        ];
        let result = classify_issues(metadata(), &issues).unwrap();

        assert_eq!(result.category_names(), vec!["Bug", "Improvement", "Task"]);
        assert_eq!(
            result.category("Bug").unwrap(),
            &["ZK-1: Crash".to_string(), "ZK-2: Leak".to_string()]
        );
        assert_eq!(result.total_items(), issues.len());
        assert_eq!(result.source, SourceKind::IssueTracker);
    }

    #[test]
    fn test_empty_kind_is_uncategorized() {
        let issues = vec![NormalizedItem::new("ZK-1", "Mystery", "")];
        let result = classify_issues(metadata(), &issues).unwrap();
        assert_eq!(result.category_names(), vec![UNCATEGORIZED]);
    }

    #[test]
    fn test_missing_id_is_an_error() {
        let issues = vec![
            NormalizedItem::new("ZK-1", "Fine", "Bug"),
            NormalizedItem::new("", "Broken", "Bug"),
        ];
        let err = classify_issues(metadata(), &issues).unwrap_err();
        assert!(matches!(err, ClassificationError::MissingId { index: 1, .. }));
    }

    #[test]
    fn test_no_issues_gives_no_categories() {
        let result = classify_issues(metadata(), &[]).unwrap();
        assert!(result.categories.is_empty());
        assert_eq!(result.total_items(), 0);
    }

    #[test]
    fn test_release_notes_fixed_display_order() {
        let body = "\
## What's Changed
* Bump netty
* Fix NPE on shutdown by @dev in https://github.com/o/r/pull/1
* Improve logging
- Add `--dry-run` flag

**Full Changelog**: https://github.com/o/r/compare/v1...v2
";
        let result = classify_release_notes(metadata(), body);

        assert_eq!(
            result.category_names(),
            vec!["Features", "Bug Fixes", "Improvements", "Others"]
        );
        assert_eq!(
            result.category("Features").unwrap(),
            &["Add --dry-run flag".to_string()]
        );
        assert_eq!(
            result.category("Others").unwrap(),
            &[
                "## What's Changed".to_string(),
                "Bump netty".to_string(),
                "**Full Changelog**: https://github.com/o/r/compare/v1...v2".to_string(),
            ]
        );
        assert_eq!(result.total_items(), 6);
        assert_eq!(result.source, SourceKind::ReleaseHost);
    }

    #[test]
    fn test_release_notes_omit_empty_categories() {
        let result = classify_release_notes(metadata(), "- Fix one\n\n   \n- fix two\n");
        assert_eq!(result.category_names(), vec!["Bug Fixes"]);
        assert_eq!(result.total_items(), 2);
    }

    #[test]
    fn test_release_notes_line_count_matches_non_empty_lines() {
        let body = "a\n\nb add\n* \nc fix\n  update d  \n";
        let expected = body
            .lines()
            .filter(|l| !clean_line(l).is_empty())
            .count();
        let result = classify_release_notes(metadata(), body);
        assert_eq!(result.total_items(), expected);
    }

    #[test]
    fn test_classify_dispatches_on_items() {
        let result = classify(metadata(), SourceItems::ReleaseNotes(String::new())).unwrap();
        assert_eq!(result.source, SourceKind::ReleaseHost);
        assert!(result.categories.is_empty());
    }
}
