//! Fixed intent extractor for testing.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::intent::{IntentExtractor, SourceKind, StructuredIntent};

/// Extractor that always answers with a preset intent (or none).
///
/// Records the source and text of every call.
#[derive(Debug, Clone)]
pub struct FixedIntentExtractor {
    intent: Arc<RwLock<Option<StructuredIntent>>>,
    calls: Arc<RwLock<Vec<(SourceKind, String)>>>,
}

impl FixedIntentExtractor {
    pub fn returning(intent: StructuredIntent) -> Self {
        Self {
            intent: Arc::new(RwLock::new(Some(intent))),
            calls: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Extractor that never finds an intent.
    pub fn nothing() -> Self {
        Self {
            intent: Arc::new(RwLock::new(None)),
            calls: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub async fn set_intent(&self, intent: Option<StructuredIntent>) {
        *self.intent.write().await = intent;
    }

    /// Get all recorded (source, text) calls.
    pub async fn recorded_calls(&self) -> Vec<(SourceKind, String)> {
        self.calls.read().await.clone()
    }
}

#[async_trait]
impl IntentExtractor for FixedIntentExtractor {
    fn name(&self) -> &str {
        "fixed"
    }

    async fn extract(&self, source: SourceKind, text: &str) -> Option<StructuredIntent> {
        self.calls.write().await.push((source, text.to_string()));
        self.intent.read().await.clone()
    }
}
