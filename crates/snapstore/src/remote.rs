use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use diagnostics::{log_debug, log_info};
use futures::TryStreamExt;
use object_store::ObjectStore;
use object_store::path::Path as ObjectPath;
use tokio::io::AsyncWriteExt;
use tokio_util::io::StreamReader;

use crate::config::RemoteConfig;
use crate::store::{SNAPSHOT_SUFFIX, is_snapshot_name, validate_name};
use crate::{LocalCopy, Result, SnapshotReader, SnapshotStore, StoreError};

/// Object-store-backed store: names map to objects in a configured bucket.
///
/// Listing goes through [`ObjectStore::list`], which pages through the
/// backend transparently, so callers never observe partial listings.
pub struct RemoteStore {
    store: Arc<dyn ObjectStore>,
    base_url: String,
}

impl RemoteStore {
    /// Wrap an already-built object store. `base_url` is only used to form
    /// the externally resolvable location returned by `save`.
    pub fn new(store: Arc<dyn ObjectStore>, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { store, base_url }
    }

    /// Build an S3-compatible store from configuration.
    pub fn open_s3(config: &RemoteConfig) -> Result<Self> {
        let url_path = config
            .url
            .strip_prefix("s3://")
            .ok_or_else(|| StoreError::Config(format!("not an s3:// url: {}", config.url)))?;
        let bucket = url_path.split('/').next().unwrap_or_default();

        let mut builder = object_store::aws::AmazonS3Builder::new()
            .with_bucket_name(bucket)
            .with_region(&config.region);

        if !config.access_key.is_empty() {
            builder = builder.with_access_key_id(&config.access_key);
        }
        if !config.secret_key.is_empty() {
            builder = builder.with_secret_access_key(&config.secret_key);
        }
        if !config.endpoint.is_empty() {
            builder = builder.with_endpoint(&config.endpoint);
        }

        let store = builder
            .build()
            .map_err(|e| StoreError::Config(format!("failed to build S3 store: {e}")))?;

        Ok(Self::new(Arc::new(store), config.url.clone()))
    }

    fn object_path(name: &str) -> Result<ObjectPath> {
        validate_name(name)?;
        ObjectPath::parse(name).map_err(|_| StoreError::InvalidName(name.to_string()))
    }
}

#[async_trait]
impl SnapshotStore for RemoteStore {
    async fn save(&self, name: &str, content: Bytes) -> Result<String> {
        let path = Self::object_path(name)?;
        let size = content.len();
        // Uploads overwrite by default, matching local save semantics.
        self.store
            .put(&path, content.into())
            .await
            .map_err(|e| StoreError::write(name, e.into()))?;
        log_debug!("uploaded snapshot {name} ({size} bytes)", name: name, size: size);
        Ok(format!("{}/{}", self.base_url, name))
    }

    async fn open(&self, name: &str) -> Result<SnapshotReader> {
        let path = Self::object_path(name)?;
        let result = self.store.get(&path).await.map_err(|e| match e {
            object_store::Error::NotFound { .. } => StoreError::not_found(name),
            other => StoreError::read(name, other.into()),
        })?;
        let stream = result.into_stream().map_err(std::io::Error::from);
        Ok(Box::new(StreamReader::new(stream)))
    }

    async fn list(&self) -> Result<Vec<String>> {
        let mut stream = self.store.list(None);
        let mut names = Vec::new();
        while let Some(meta) = stream
            .try_next()
            .await
            .map_err(|e| StoreError::List(e.into()))?
        {
            let name = meta.location.to_string();
            if is_snapshot_name(&name) {
                names.push(name);
            }
        }
        Ok(names)
    }

    async fn local_path(&self, name: &str) -> Result<LocalCopy> {
        let mut reader = self.open(name).await?;

        // The temp file is owned by this request alone; the guard deletes it
        // when dropped, including on error paths below.
        let tmp = tempfile::Builder::new()
            .prefix("coldsnap-")
            .suffix(SNAPSHOT_SUFFIX)
            .tempfile()
            .map_err(|e| StoreError::read(name, e))?;

        let mut file = tokio::fs::File::create(tmp.path())
            .await
            .map_err(|e| StoreError::read(name, e))?;
        let copied = tokio::io::copy(&mut reader, &mut file)
            .await
            .map_err(|e| StoreError::read(name, e))?;
        file.flush()
            .await
            .map_err(|e| StoreError::read(name, e))?;

        log_info!("materialized remote snapshot {name} ({copied} bytes)", name: name, copied: copied);
        Ok(LocalCopy::Materialized(tmp))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use object_store::memory::InMemory;

    fn memory_store() -> RemoteStore {
        RemoteStore::new(Arc::new(InMemory::new()), "mem://bucket/")
    }

    #[tokio::test]
    async fn save_returns_object_location() {
        let store = memory_store();
        let location = store
            .save("items_20251101_100000_UTC.parquet", Bytes::from_static(b"abc"))
            .await
            .expect("save");
        assert_eq!(location, "mem://bucket/items_20251101_100000_UTC.parquet");
    }

    #[tokio::test]
    async fn open_streams_saved_content() {
        use tokio::io::AsyncReadExt;

        let store = memory_store();
        store
            .save("a.parquet", Bytes::from_static(b"hello"))
            .await
            .expect("save");

        let mut reader = store.open("a.parquet").await.expect("open");
        let mut content = Vec::new();
        reader.read_to_end(&mut content).await.expect("read");
        assert_eq!(content, b"hello");
    }

    #[tokio::test]
    async fn open_missing_object_is_not_found() {
        let store = memory_store();
        let err = match store.open("missing.parquet").await {
            Ok(_) => panic!("missing"),
            Err(err) => err,
        };
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn list_applies_suffix_filter() {
        let store = memory_store();
        store
            .save("a.parquet", Bytes::from_static(b"x"))
            .await
            .expect("save parquet");
        store
            .save("b.csv", Bytes::from_static(b"x"))
            .await
            .expect("save csv");

        assert_eq!(store.list().await.expect("list"), vec!["a.parquet"]);
    }

    #[tokio::test]
    async fn local_path_materializes_and_cleans_up() {
        let store = memory_store();
        store
            .save("a.parquet", Bytes::from_static(b"payload"))
            .await
            .expect("save");

        let copy = store.local_path("a.parquet").await.expect("materialize");
        let tmp_path = copy.path().to_path_buf();
        assert_eq!(
            std::fs::read(&tmp_path).expect("read temp file"),
            b"payload"
        );

        drop(copy);
        assert!(!tmp_path.exists(), "temp file must be removed on drop");
    }

    #[tokio::test]
    async fn local_path_of_missing_object_leaves_no_temp_file() {
        let store = memory_store();
        let err = store.local_path("missing.parquet").await.expect_err("missing");
        assert!(matches!(err, StoreError::NotFound(_)));
    }
}
