//! In-memory artifact store for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::store::{validate_name, Artifact, ArtifactStore, StoreError};

/// Artifact store backed by a map. Validates names like the file store.
#[derive(Debug, Default, Clone)]
pub struct MemoryArtifactStore {
    artifacts: Arc<RwLock<HashMap<String, Vec<u8>>>>,
    /// If set, puts fail with this message.
    put_error: Arc<RwLock<Option<String>>>,
}

impl MemoryArtifactStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every put fail.
    pub async fn fail_puts(&self, message: impl Into<String>) {
        *self.put_error.write().await = Some(message.into());
    }

    /// Names of stored artifacts, sorted.
    pub async fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.artifacts.read().await.keys().cloned().collect();
        names.sort();
        names
    }

    pub async fn len(&self) -> usize {
        self.artifacts.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.artifacts.read().await.is_empty()
    }
}

#[async_trait]
impl ArtifactStore for MemoryArtifactStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn put(&self, artifact: &Artifact) -> Result<(), StoreError> {
        validate_name(&artifact.filename)?;
        if let Some(message) = self.put_error.read().await.clone() {
            return Err(StoreError::Io(std::io::Error::other(message)));
        }
        self.artifacts
            .write()
            .await
            .insert(artifact.filename.clone(), artifact.bytes.clone());
        Ok(())
    }

    async fn get(&self, name: &str) -> Result<Option<Vec<u8>>, StoreError> {
        validate_name(name)?;
        Ok(self.artifacts.read().await.get(name).cloned())
    }

    async fn exists(&self, name: &str) -> Result<bool, StoreError> {
        validate_name(name)?;
        Ok(self.artifacts.read().await.contains_key(name))
    }
}
