use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::io::AsyncRead;

use crate::{Result, StoreError};

/// Suffix that identifies a stored artifact as a queryable snapshot.
///
/// Both backends apply this filter in [`SnapshotStore::list`] so callers see
/// identical listings regardless of where the artifacts live. Other exported
/// artifacts (CSV variants) are stored but never listed.
pub const SNAPSHOT_SUFFIX: &str = ".parquet";

/// Readable byte stream positioned at the start of an artifact's content.
pub type SnapshotReader = Box<dyn AsyncRead + Send + Unpin>;

pub(crate) fn is_snapshot_name(name: &str) -> bool {
    name.to_ascii_lowercase().ends_with(SNAPSHOT_SUFFIX)
}

/// Reject names that would escape the backing container.
pub(crate) fn validate_name(name: &str) -> Result<&str> {
    if name.is_empty()
        || name == "."
        || name == ".."
        || name.contains('/')
        || name.contains('\\')
    {
        return Err(StoreError::InvalidName(name.to_string()));
    }
    Ok(name)
}

/// Persistence contract shared by every storage backend.
///
/// Implementations must be substitutable without caller code changes: the
/// query path runs identical resolution logic against either backend, and
/// the only difference it may observe is how [`SnapshotStore::local_path`]
/// obtains a filesystem path for the analytical engine.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Persist the full `content` under `name`, overwriting any existing
    /// artifact with the same name, and return an opaque storage location
    /// (a filesystem path or object URI). The content is fully written
    /// before this returns.
    async fn save(&self, name: &str, content: Bytes) -> Result<String>;

    /// Open the named artifact for reading from the start.
    async fn open(&self, name: &str) -> Result<SnapshotReader>;

    /// Every stored name carrying the snapshot suffix, in unspecified order.
    async fn list(&self) -> Result<Vec<String>>;

    /// Produce a locally readable copy of the named artifact.
    ///
    /// Local backends return the stored path after confirming it is
    /// readable; remote backends download into a temporary file owned by
    /// the returned guard.
    async fn local_path(&self, name: &str) -> Result<LocalCopy>;
}

/// A locally readable copy of a stored snapshot.
///
/// Holds the temporary file alive for materialized remote artifacts; the
/// file is deleted when the guard drops, on success and failure paths alike.
#[derive(Debug)]
pub enum LocalCopy {
    /// The artifact already lives on the local filesystem.
    Stored(PathBuf),
    /// The artifact was downloaded into a temporary file.
    Materialized(tempfile::NamedTempFile),
}

impl LocalCopy {
    pub fn path(&self) -> &Path {
        match self {
            LocalCopy::Stored(path) => path,
            LocalCopy::Materialized(file) => file.path(),
        }
    }
}
