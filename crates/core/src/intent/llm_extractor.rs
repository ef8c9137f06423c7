//! LLM-backed intent extraction.
//!
//! The model is asked for a bare JSON object. Anything that does not parse
//! into a complete intent is reported as "no intent", never as an error.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::llm::{CompletionRequest, LlmClient};

use super::types::{SourceKind, StructuredIntent};
use super::IntentExtractor;

const ISSUE_TRACKER_PROMPT: &str = r#"You turn release-notes requests into structured data.
Reply with JSON only, exactly in this shape:
{
  "project": "<JIRA_PROJECT_KEY>",
  "version": "<VERSION>"
}
Rules:
- project is the JIRA project key in upper case
- version is copied from the request as written
- no prose, no code fences"#;

const RELEASE_HOST_PROMPT: &str = r#"You turn release-notes requests into structured data.
Reply with JSON only, exactly in this shape:
{
  "owner": "<GITHUB_OWNER>",
  "repo": "<GITHUB_REPO>",
  "version": "<TAG_OR_VERSION>"
}
Rules:
- owner and repo in lower case where possible
- version is copied from the request as written (e.g. 3.9.0 or v3.9.0)
- no prose, no code fences"#;

/// Intent extractor that prompts an LLM.
pub struct LlmIntentExtractor {
    client: Arc<dyn LlmClient>,
    max_tokens: u32,
}

impl LlmIntentExtractor {
    pub fn new(client: Arc<dyn LlmClient>) -> Self {
        Self {
            client,
            max_tokens: 256,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    fn system_prompt(source: SourceKind) -> &'static str {
        match source {
            SourceKind::IssueTracker => ISSUE_TRACKER_PROMPT,
            SourceKind::ReleaseHost => RELEASE_HOST_PROMPT,
        }
    }
}

#[async_trait]
impl IntentExtractor for LlmIntentExtractor {
    fn name(&self) -> &str {
        "llm"
    }

    async fn extract(&self, source: SourceKind, text: &str) -> Option<StructuredIntent> {
        let request = CompletionRequest::new(text)
            .with_system(Self::system_prompt(source))
            .with_max_tokens(self.max_tokens);

        let response = match self.client.complete(request).await {
            Ok(response) => response,
            Err(e) => {
                warn!(provider = self.client.provider(), error = %e, "Intent extraction call failed");
                return None;
            }
        };

        debug!(
            model = %response.model,
            output_tokens = response.usage.output_tokens,
            "Intent extraction response received"
        );

        parse_intent(source, &response.text)
    }
}

/// Parse a model reply into an intent for `source`.
pub fn parse_intent(source: SourceKind, text: &str) -> Option<StructuredIntent> {
    let value: Value = serde_json::from_str(json_object_slice(text)).ok()?;
    if !value.is_object() {
        return None;
    }

    match source {
        SourceKind::IssueTracker => {
            let project = string_field(&value, "project")?;
            let version = string_field(&value, "version")?;
            Some(StructuredIntent::issue_tracker(&project, &version))
        }
        SourceKind::ReleaseHost => {
            let owner = string_field(&value, "owner")?;
            let repo = string_field(&value, "repo")?;
            let version = string_field(&value, "version")?;
            Some(StructuredIntent::release_host(&owner, &repo, &version))
        }
    }
}

/// Slice from the first `{` to the last `}` (tolerates code fences and chatter).
fn json_object_slice(text: &str) -> &str {
    match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if start < end => &text[start..=end],
        _ => text,
    }
}

fn string_field(value: &Value, key: &str) -> Option<String> {
    let s = match value.get(key)? {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    (!s.is_empty()).then_some(s)
}
