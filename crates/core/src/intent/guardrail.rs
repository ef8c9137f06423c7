//! Safety screening of incoming requests.

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

use crate::llm::{CompletionRequest, LlmClient};

/// The guardrail could not reach a verdict.
#[derive(Debug, Error)]
pub enum GuardrailError {
    #[error("Guardrail check failed: {0}")]
    Unavailable(String),
}

/// Outcome of a safety check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Safe,
    Unsafe,
}

impl Verdict {
    /// Interpret a one-word moderation reply. Only `SAFE` is safe.
    pub fn from_reply(reply: &str) -> Self {
        if reply.trim().eq_ignore_ascii_case("safe") {
            Verdict::Safe
        } else {
            Verdict::Unsafe
        }
    }

    pub fn is_safe(&self) -> bool {
        matches!(self, Verdict::Safe)
    }
}

/// Screens free text before any pipeline work happens.
#[async_trait]
pub trait Guardrail: Send + Sync {
    fn name(&self) -> &str;

    async fn check(&self, text: &str) -> Result<Verdict, GuardrailError>;
}

/// Guardrail that lets every request through.
#[derive(Debug, Default, Clone)]
pub struct NoopGuardrail;

#[async_trait]
impl Guardrail for NoopGuardrail {
    fn name(&self) -> &str {
        "none"
    }

    async fn check(&self, _text: &str) -> Result<Verdict, GuardrailError> {
        Ok(Verdict::Safe)
    }
}

const MODERATION_PROMPT: &str = r#"You are the safety filter of a developer tool that writes software release notes from JIRA and GitHub data.

Classify the user's message as SAFE or UNSAFE and reply with exactly one word.

The tool is used for release notes, changelogs, JIRA projects and fix versions, GitHub repositories and tags, open-source project names, versioning, CI/CD and general technical questions. All of these are SAFE.

Reply UNSAFE only when the message clearly contains or asks for:
1) self-harm or suicide content
2) sexual or explicit content
3) hate or harassment against protected groups
4) real-world violence, weapons, terrorism or extremism
5) instructions for illegal wrongdoing (fraud, theft, malware, credential theft, bypassing security)

Reply with one word: SAFE or UNSAFE"#;

/// Guardrail backed by a moderation prompt.
pub struct LlmGuardrail {
    client: Arc<dyn LlmClient>,
}

impl LlmGuardrail {
    pub fn new(client: Arc<dyn LlmClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Guardrail for LlmGuardrail {
    fn name(&self) -> &str {
        "llm"
    }

    async fn check(&self, text: &str) -> Result<Verdict, GuardrailError> {
        let request = CompletionRequest::new(text)
            .with_system(MODERATION_PROMPT)
            .with_max_tokens(8);

        let response = self
            .client
            .complete(request)
            .await
            .map_err(|e| GuardrailError::Unavailable(e.to_string()))?;

        let verdict = Verdict::from_reply(&response.text);
        debug!(model = %response.model, ?verdict, "Guardrail verdict");
        Ok(verdict)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verdict_from_reply() {
        assert_eq!(Verdict::from_reply("SAFE"), Verdict::Safe);
        assert_eq!(Verdict::from_reply("  safe\n"), Verdict::Safe);
        assert_eq!(Verdict::from_reply("UNSAFE"), Verdict::Unsafe);
        assert_eq!(Verdict::from_reply("SAFE, because..."), Verdict::Unsafe);
        assert_eq!(Verdict::from_reply(""), Verdict::Unsafe);
    }

    #[tokio::test]
    async fn test_noop_guardrail_allows_everything() {
        let verdict = NoopGuardrail.check("anything at all").await.unwrap();
        assert!(verdict.is_safe());
    }
}
