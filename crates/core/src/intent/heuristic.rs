//! Pattern-based intent extraction that works without an LLM.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex_lite::Regex;

use super::types::{SourceKind, StructuredIntent};
use super::IntentExtractor;

static VERSION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bv?\d+(?:\.\d+)+(?:[-+][0-9A-Za-z.]+)?\b").unwrap());

static OWNER_REPO: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b([A-Za-z0-9_.-]+)/([A-Za-z0-9_.-]+)\b").unwrap());

static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Za-z][A-Za-z0-9_]*").unwrap());

/// Words that never name a project.
const FILLER: &[&str] = &[
    "a", "an", "and", "for", "from", "fixversion", "generate", "get", "give", "jira", "me",
    "notes", "of", "please", "project", "release", "releases", "show", "tag", "the", "version",
    "with",
];

/// Extracts intents with regular expressions.
///
/// - version: first dotted number, optionally `v`-prefixed (`3.9.0`, `v18.2.0`)
/// - release host: first `owner/repo` token
/// - issue tracker: last non-filler word before the version
#[derive(Debug, Default, Clone)]
pub struct HeuristicIntentExtractor;

impl HeuristicIntentExtractor {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl IntentExtractor for HeuristicIntentExtractor {
    fn name(&self) -> &str {
        "heuristic"
    }

    async fn extract(&self, source: SourceKind, text: &str) -> Option<StructuredIntent> {
        match source {
            SourceKind::IssueTracker => extract_project(text),
            SourceKind::ReleaseHost => extract_repository(text),
        }
    }
}

fn extract_project(text: &str) -> Option<StructuredIntent> {
    let version = VERSION.find(text)?;
    let before = &text[..version.start()];

    let project = WORD
        .find_iter(before)
        .map(|m| m.as_str())
        .filter(|w| !FILLER.contains(&w.to_lowercase().as_str()))
        .last()?;

    Some(StructuredIntent::issue_tracker(project, version.as_str()))
}

fn extract_repository(text: &str) -> Option<StructuredIntent> {
    let caps = OWNER_REPO.captures(text)?;
    let whole = caps.get(0)?;
    let owner = caps.get(1)?.as_str();
    let repo = caps.get(2)?.as_str();

    // The version must come from outside the owner/repo token.
    let rest = &text[whole.end()..];
    let version = VERSION
        .find(rest)
        .or_else(|| VERSION.find(&text[..whole.start()]))?;

    Some(StructuredIntent::release_host(owner, repo, version.as_str()))
}
