//! Mock guardrail for testing.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::intent::{Guardrail, GuardrailError, Verdict};

/// Guardrail with a configurable verdict.
#[derive(Debug, Clone)]
pub struct MockGuardrail {
    verdict: Arc<RwLock<Verdict>>,
    /// If set, checks fail with this message.
    error: Arc<RwLock<Option<String>>>,
    checked: Arc<RwLock<Vec<String>>>,
}

impl Default for MockGuardrail {
    fn default() -> Self {
        Self::new()
    }
}

impl MockGuardrail {
    /// Create a guardrail that lets everything through.
    pub fn new() -> Self {
        Self {
            verdict: Arc::new(RwLock::new(Verdict::Safe)),
            error: Arc::new(RwLock::new(None)),
            checked: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Create a guardrail that rejects everything.
    pub fn rejecting() -> Self {
        let mut guardrail = Self::new();
        guardrail.verdict = Arc::new(RwLock::new(Verdict::Unsafe));
        guardrail
    }

    pub async fn set_verdict(&self, verdict: Verdict) {
        *self.verdict.write().await = verdict;
    }

    /// Make every check fail.
    pub async fn set_unavailable(&self, message: impl Into<String>) {
        *self.error.write().await = Some(message.into());
    }

    /// Texts that were checked, in order.
    pub async fn checked_texts(&self) -> Vec<String> {
        self.checked.read().await.clone()
    }
}

#[async_trait]
impl Guardrail for MockGuardrail {
    fn name(&self) -> &str {
        "mock"
    }

    async fn check(&self, text: &str) -> Result<Verdict, GuardrailError> {
        self.checked.write().await.push(text.to_string());
        if let Some(message) = self.error.read().await.clone() {
            return Err(GuardrailError::Unavailable(message));
        }
        Ok(*self.verdict.read().await)
    }
}
