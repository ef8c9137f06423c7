//! File system artifact store.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use super::{validate_name, Artifact, ArtifactStore, StoreError};

/// Stores artifacts as files in one directory.
///
/// Writes go to a hidden temp file that is renamed over the target, so a
/// reader never sees a partial artifact. Concurrent writes of the same name
/// are last-writer-wins.
#[derive(Debug, Clone)]
pub struct FsArtifactStore {
    root: PathBuf,
}

impl FsArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, name: &str) -> Result<PathBuf, StoreError> {
        validate_name(name)?;
        Ok(self.root.join(name))
    }

    async fn ensure_root(&self) -> Result<(), StoreError> {
        fs::create_dir_all(&self.root)
            .await
            .map_err(|source| StoreError::DirectoryCreationFailed {
                path: self.root.clone(),
                source,
            })
    }
}

#[async_trait]
impl ArtifactStore for FsArtifactStore {
    fn name(&self) -> &str {
        "fs"
    }

    async fn put(&self, artifact: &Artifact) -> Result<(), StoreError> {
        let destination = self.path_for(&artifact.filename)?;
        self.ensure_root().await?;

        let temp = self.root.join(format!(
            ".{}.{}.tmp",
            artifact.filename,
            temp_suffix()
        ));

        let write = async {
            let mut file = fs::File::create(&temp).await?;
            file.write_all(&artifact.bytes).await?;
            file.sync_all().await?;
            drop(file);
            fs::rename(&temp, &destination).await
        }
        .await;

        if let Err(source) = write {
            let _ = fs::remove_file(&temp).await;
            return Err(StoreError::WriteFailed {
                path: destination,
                source,
            });
        }

        debug!(
            "Stored artifact {} ({} bytes)",
            destination.display(),
            artifact.bytes.len()
        );
        Ok(())
    }

    async fn get(&self, name: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let path = self.path_for(name)?;
        match fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::Io(e)),
        }
    }

    async fn exists(&self, name: &str) -> Result<bool, StoreError> {
        let path = self.path_for(name)?;
        Ok(fs::try_exists(&path).await?)
    }
}

/// Unique suffix so concurrent writers never share a temp file.
fn temp_suffix() -> String {
    use std::sync::atomic::{AtomicU64, Ordering};
    static COUNTER: AtomicU64 = AtomicU64::new(0);
    format!(
        "{}-{}",
        std::process::id(),
        COUNTER.fetch_add(1, Ordering::Relaxed)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_put_then_get() {
        let temp = TempDir::new().unwrap();
        let store = FsArtifactStore::new(temp.path().join("generated_pdfs"));
        let artifact = Artifact::new("KAFKA_v3.6.0_release_notes.pdf", b"%PDF-1.3".to_vec());

        store.put(&artifact).await.unwrap();

        assert!(store.exists(&artifact.filename).await.unwrap());
        assert_eq!(
            store.get(&artifact.filename).await.unwrap(),
            Some(b"%PDF-1.3".to_vec())
        );
    }

    #[tokio::test]
    async fn test_put_overwrites() {
        let temp = TempDir::new().unwrap();
        let store = FsArtifactStore::new(temp.path());

        store.put(&Artifact::new("a.pdf", b"one".to_vec())).await.unwrap();
        store.put(&Artifact::new("a.pdf", b"two".to_vec())).await.unwrap();

        assert_eq!(store.get("a.pdf").await.unwrap(), Some(b"two".to_vec()));
        // No temp files left behind.
        let mut entries = fs::read_dir(temp.path()).await.unwrap();
        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await.unwrap() {
            names.push(entry.file_name().to_string_lossy().to_string());
        }
        assert_eq!(names, vec!["a.pdf".to_string()]);
    }

    #[tokio::test]
    async fn test_missing_artifact() {
        let temp = TempDir::new().unwrap();
        let store = FsArtifactStore::new(temp.path());
        assert_eq!(store.get("nope.pdf").await.unwrap(), None);
        assert!(!store.exists("nope.pdf").await.unwrap());
    }

    #[tokio::test]
    async fn test_rejects_traversal() {
        let temp = TempDir::new().unwrap();
        let store = FsArtifactStore::new(temp.path());
        let err = store
            .put(&Artifact::new("../escape.pdf", vec![1]))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidName(_)));
        assert!(matches!(
            store.get("../escape.pdf").await,
            Err(StoreError::InvalidName(_))
        ));
    }
}
