//! Rule-based choice of upstream source for a free-text request.

use once_cell::sync::Lazy;
use regex_lite::Regex;

use super::types::SourceKind;

static OWNER_REPO: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[a-z0-9_.-]+/[a-z0-9_.-]+\b").unwrap());

/// Decide which source adapter answers `text`.
///
/// Rules, first match wins:
/// 1. mentions "github" → release host
/// 2. contains an `owner/repo` token → release host
/// 3. anything else → issue tracker (also the explicit "jira" case)
pub fn route_source(text: &str) -> SourceKind {
    let msg = text.trim().to_lowercase();

    if msg.contains("github") {
        return SourceKind::ReleaseHost;
    }
    if OWNER_REPO.is_match(&msg) {
        return SourceKind::ReleaseHost;
    }
    SourceKind::IssueTracker
}
