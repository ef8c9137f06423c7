//! Persistence of generated artifacts, keyed by a deterministic filename.

mod fs_store;

pub use fs_store::FsArtifactStore;

use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;

use crate::intent::ReleaseTarget;

/// Errors from an artifact store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Name is empty, contains a path separator or a `..` component.
    #[error("invalid artifact name: '{0}'")]
    InvalidName(String),

    /// Failed to create the output directory.
    #[error("failed to create directory: {path}")]
    DirectoryCreationFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write or move the artifact into place.
    #[error("failed to write artifact: {path}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A rendered document and the name it is stored under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl Artifact {
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            bytes,
        }
    }
}

/// Deterministic filename for a release's notes.
///
/// Issue tracker: `{PROJECT}_v{VERSION}_release_notes.pdf`. Release host:
/// `{owner}_{repo}_v{version}_release_notes.pdf`, with any `/` in the repo
/// replaced by `_`. `version` is the resolved version (the tag actually
/// found, for the release host).
pub fn artifact_filename(target: &ReleaseTarget, version: &str) -> String {
    match target {
        ReleaseTarget::Project { key } => format!("{}_v{}_release_notes.pdf", key, version),
        ReleaseTarget::Repository { owner, repo } => format!(
            "{}_{}_v{}_release_notes.pdf",
            owner,
            repo.replace('/', "_"),
            version
        ),
    }
}

/// Check that a name is a plain file name.
pub fn validate_name(name: &str) -> Result<(), StoreError> {
    let invalid = name.is_empty()
        || name.contains('/')
        || name.contains('\\')
        || name.contains("..")
        || name.contains('\0');
    if invalid {
        return Err(StoreError::InvalidName(name.to_string()));
    }
    Ok(())
}

/// Blob store for artifacts.
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Name of this store for logging.
    fn name(&self) -> &str;

    /// Store an artifact, replacing any previous one with the same name.
    async fn put(&self, artifact: &Artifact) -> Result<(), StoreError>;

    /// Read an artifact. `Ok(None)` if it does not exist.
    async fn get(&self, name: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Whether an artifact exists.
    async fn exists(&self, name: &str) -> Result<bool, StoreError>;
}
