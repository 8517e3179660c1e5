use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::{LocalStore, RemoteStore, Result, SnapshotStore};

/// Remote object storage configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Bucket URL (e.g., "s3://bucket" or "s3://bucket/prefix")
    pub url: String,

    /// AWS region (for S3)
    #[serde(default)]
    pub region: String,

    /// AWS access key
    #[serde(default)]
    pub access_key: String,

    /// AWS secret key
    #[serde(default)]
    pub secret_key: String,

    /// Custom S3 endpoint (for MinIO, R2, etc.)
    #[serde(default)]
    pub endpoint: String,
}

/// Backend selection, decided once at process start and immutable after.
#[derive(Debug, Clone)]
pub enum StoreConfig {
    Local { root: PathBuf },
    Remote(RemoteConfig),
}

impl StoreConfig {
    /// An `s3://` location selects the remote backend; anything else is
    /// treated as a local root directory.
    pub fn from_location(location: &str, remote: RemoteConfig) -> Self {
        if location.starts_with("s3://") {
            StoreConfig::Remote(RemoteConfig {
                url: location.to_string(),
                ..remote
            })
        } else {
            StoreConfig::Local {
                root: PathBuf::from(location),
            }
        }
    }
}

/// Build the active storage backend from configuration.
pub fn build_store(config: &StoreConfig) -> Result<Arc<dyn SnapshotStore>> {
    match config {
        StoreConfig::Local { root } => Ok(Arc::new(LocalStore::new(root))),
        StoreConfig::Remote(remote) => Ok(Arc::new(RemoteStore::open_s3(remote)?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_string_selects_backend() {
        let config = StoreConfig::from_location("storage/parquet", RemoteConfig::default());
        assert!(matches!(config, StoreConfig::Local { .. }));

        let config = StoreConfig::from_location("s3://bucket/snapshots", RemoteConfig::default());
        match config {
            StoreConfig::Remote(remote) => assert_eq!(remote.url, "s3://bucket/snapshots"),
            other => panic!("expected remote config, got {other:?}"),
        }
    }

    #[test]
    fn local_factory_builds() {
        let config = StoreConfig::Local {
            root: PathBuf::from("storage/parquet"),
        };
        assert!(build_store(&config).is_ok());
    }
}
