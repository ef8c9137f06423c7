//! Mock source adapter for testing.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::intent::{SourceKind, StructuredIntent};
use crate::source::{FetchError, ReleaseMetadata, SourceAdapter, SourceItems};

use super::fixtures;

/// Which adapter operation was called.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOperation {
    Metadata,
    Items,
}

/// A recorded adapter call for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedFetch {
    pub operation: FetchOperation,
    pub intent: StructuredIntent,
}

/// Mock implementation of the SourceAdapter trait.
///
/// Returns configured metadata and items, records every call and can be told
/// to fail either operation.
#[derive(Debug, Clone)]
pub struct MockSourceAdapter {
    kind: SourceKind,
    /// Metadata to return. `None` derives it from the intent.
    metadata: Arc<RwLock<Option<ReleaseMetadata>>>,
    items: Arc<RwLock<SourceItems>>,
    metadata_error: Arc<RwLock<Option<String>>>,
    items_error: Arc<RwLock<Option<String>>>,
    calls: Arc<RwLock<Vec<RecordedFetch>>>,
}

impl MockSourceAdapter {
    /// Create a mock that returns no items.
    pub fn new(kind: SourceKind) -> Self {
        let items = match kind {
            SourceKind::IssueTracker => SourceItems::Issues(Vec::new()),
            SourceKind::ReleaseHost => SourceItems::ReleaseNotes(String::new()),
        };
        Self {
            kind,
            metadata: Arc::new(RwLock::new(None)),
            items: Arc::new(RwLock::new(items)),
            metadata_error: Arc::new(RwLock::new(None)),
            items_error: Arc::new(RwLock::new(None)),
            calls: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub async fn set_metadata(&self, metadata: ReleaseMetadata) {
        *self.metadata.write().await = Some(metadata);
    }

    pub async fn set_items(&self, items: SourceItems) {
        *self.items.write().await = items;
    }

    /// Make metadata fetches fail with `message`.
    pub async fn fail_metadata(&self, message: impl Into<String>) {
        *self.metadata_error.write().await = Some(message.into());
    }

    /// Make item fetches fail with `message`.
    pub async fn fail_items(&self, message: impl Into<String>) {
        *self.items_error.write().await = Some(message.into());
    }

    /// Get all recorded calls.
    pub async fn recorded_calls(&self) -> Vec<RecordedFetch> {
        self.calls.read().await.clone()
    }

    /// Get the number of calls made.
    pub async fn call_count(&self) -> usize {
        self.calls.read().await.len()
    }

    async fn record(&self, operation: FetchOperation, intent: &StructuredIntent) {
        self.calls.write().await.push(RecordedFetch {
            operation,
            intent: intent.clone(),
        });
    }
}

#[async_trait]
impl SourceAdapter for MockSourceAdapter {
    fn kind(&self) -> SourceKind {
        self.kind
    }

    async fn fetch_metadata(
        &self,
        intent: &StructuredIntent,
    ) -> Result<ReleaseMetadata, FetchError> {
        self.record(FetchOperation::Metadata, intent).await;

        if let Some(message) = self.metadata_error.read().await.clone() {
            return Err(FetchError::Upstream(message));
        }
        Ok(self
            .metadata
            .read()
            .await
            .clone()
            .unwrap_or_else(|| fixtures::metadata_for(intent)))
    }

    async fn fetch_items(
        &self,
        intent: &StructuredIntent,
        _metadata: &ReleaseMetadata,
    ) -> Result<SourceItems, FetchError> {
        self.record(FetchOperation::Items, intent).await;

        if let Some(message) = self.items_error.read().await.clone() {
            return Err(FetchError::Upstream(message));
        }
        Ok(self.items.read().await.clone())
    }
}
