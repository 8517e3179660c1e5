use std::io;
use std::path::PathBuf;

use async_trait::async_trait;
use bytes::Bytes;
use diagnostics::log_debug;

use crate::store::{is_snapshot_name, validate_name};
use crate::{LocalCopy, Result, SnapshotReader, SnapshotStore, StoreError};

/// Filesystem-backed store: names map 1:1 to files under a root directory.
pub struct LocalStore {
    root: PathBuf,
}

impl LocalStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &std::path::Path {
        &self.root
    }
}

#[async_trait]
impl SnapshotStore for LocalStore {
    async fn save(&self, name: &str, content: Bytes) -> Result<String> {
        validate_name(name)?;
        // Idempotent: creating the root on every save keeps first use cheap.
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| StoreError::write(name, e))?;
        let path = self.root.join(name);
        tokio::fs::write(&path, &content)
            .await
            .map_err(|e| StoreError::write(name, e))?;
        log_debug!("saved local snapshot {name} ({size} bytes)", name: name, size: content.len());
        Ok(path.display().to_string())
    }

    async fn open(&self, name: &str) -> Result<SnapshotReader> {
        validate_name(name)?;
        let path = self.root.join(name);
        match tokio::fs::File::open(&path).await {
            Ok(file) => Ok(Box::new(file)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(StoreError::not_found(name))
            }
            Err(e) => Err(StoreError::read(name, e)),
        }
    }

    async fn list(&self) -> Result<Vec<String>> {
        let mut dir = match tokio::fs::read_dir(&self.root).await {
            Ok(dir) => dir,
            // No root directory means nothing has been exported yet.
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::List(e)),
        };
        let mut names = Vec::new();
        while let Some(entry) = dir.next_entry().await.map_err(StoreError::List)? {
            if let Ok(name) = entry.file_name().into_string() {
                if is_snapshot_name(&name) {
                    names.push(name);
                }
            }
        }
        Ok(names)
    }

    async fn local_path(&self, name: &str) -> Result<LocalCopy> {
        // Open once so a listing stale relative to the filesystem fails
        // loudly here instead of inside the analytical engine.
        let _probe = self.open(name).await?;
        Ok(LocalCopy::Stored(self.root.join(name)))
    }
}
