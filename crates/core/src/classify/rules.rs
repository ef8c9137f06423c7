//! Line cleaning and keyword rules for free-text release notes.

use once_cell::sync::Lazy;
use regex_lite::Regex;

use super::types::ReleaseCategory;

static MARKDOWN_LINK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[([^\]]*)\]\([^)]*\)").unwrap());
/// A bullet glyph only counts when whitespace or the end of the line follows,
/// so `**bold**` keeps both asterisks.
static LEADING_BULLET: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[*+\-](?:\s+|$)").unwrap());

/// First match wins, so a line mentioning both a fix and a feature is a fix.
const KEYWORD_RULES: &[(ReleaseCategory, &[&str])] = &[
    (ReleaseCategory::BugFixes, &["fix", "bug"]),
    (ReleaseCategory::Features, &["feature", "add", "new"]),
    (
        ReleaseCategory::Improvements,
        &["improve", "update", "enhance"],
    ),
];

/// Reduce one release-note line to plain text.
///
/// Backticks are dropped, links become their text, whitespace is collapsed
/// and a single leading bullet is removed. Applying it twice gives the same
/// result as applying it once, except for lines that start with several
/// bullets (`- - x`).
pub fn clean_line(line: &str) -> String {
    let mut text = line.replace('`', "");
    // Nested links unwrap one level per pass.
    while MARKDOWN_LINK.is_match(&text) {
        text = MARKDOWN_LINK.replace_all(&text, "$1").into_owned();
    }
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    let unbulleted = LEADING_BULLET.replace(&collapsed, "");
    unbulleted.trim().to_string()
}

/// Pick the category for a cleaned line.
pub fn infer_category(line: &str) -> ReleaseCategory {
    let lower = line.to_lowercase();
    KEYWORD_RULES
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(category, _)| *category)
        .unwrap_or(ReleaseCategory::Others)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_line_strips_markup() {
        assert_eq!(
            clean_line("* Fix `NPE` in [ZOOKEEPER-1](https://x/1)  handler "),
            "Fix NPE in ZOOKEEPER-1 handler"
        );
        assert_eq!(clean_line("-   Add metrics"), "Add metrics");
        assert_eq!(clean_line("+ Bump deps"), "Bump deps");
        assert_eq!(clean_line("*"), "");
        assert_eq!(clean_line("   "), "");
    }

    #[test]
    fn test_clean_line_strips_only_one_bullet() {
        assert_eq!(clean_line("- - nested"), "- nested");
        assert_eq!(clean_line(&clean_line("- - nested")), "nested");
    }

    #[test]
    fn test_glyph_without_space_is_not_a_bullet() {
        assert_eq!(
            clean_line("**Full Changelog**: https://github.com/o/r/compare/v1...v2"),
            "**Full Changelog**: https://github.com/o/r/compare/v1...v2"
        );
        assert_eq!(clean_line("-1 is rejected"), "-1 is rejected");
        assert_eq!(clean_line("+Bump deps"), "+Bump deps");
    }

    #[test]
    fn test_clean_line_is_idempotent() {
        let samples = [
            "* Fix `NPE` in [link](http://a)",
            "  -  Added   `feature` flag ",
            "## What's Changed",
            "+ [a](b) [c](d)",
            "**Full Changelog**: https://github.com/o/r/compare/v1...v2",
            "`` ` ``",
            "[[nested](x)](y)",
            "\t*\tTabbed bullet",
            "* **Breaking**: drop Java 8",
            "-",
        ];
        for sample in samples {
            let once = clean_line(sample);
            let twice = clean_line(&once);
            assert_eq!(once, twice, "cleaning '{}' is not idempotent", sample);
        }
    }

    #[test]
    fn test_fix_takes_precedence_over_feature() {
        assert_eq!(
            infer_category("Fix crash in new feature"),
            ReleaseCategory::BugFixes
        );
    }

    #[test]
    fn test_infer_category_rules() {
        assert_eq!(infer_category("Add retry support"), ReleaseCategory::Features);
        assert_eq!(infer_category("BUG: leak"), ReleaseCategory::BugFixes);
        assert_eq!(
            infer_category("Improve startup time"),
            ReleaseCategory::Improvements
        );
        assert_eq!(infer_category("Update docs"), ReleaseCategory::Improvements);
        assert_eq!(infer_category("Bump version"), ReleaseCategory::Others);
    }

    #[test]
    fn test_keyword_match_is_substring() {
        // "address" contains "add"
        assert_eq!(infer_category("Address review"), ReleaseCategory::Features);
        // "prefix" contains "fix"
        assert_eq!(infer_category("Rename prefix"), ReleaseCategory::BugFixes);
    }
}
