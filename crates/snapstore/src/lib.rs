//! Pluggable snapshot storage for the coldsnap pipeline.
//!
//! A [`SnapshotStore`] persists immutable snapshot artifacts under a name,
//! lists the names it holds, and opens a named artifact for reading. Two
//! implementations exist with identical observable behavior:
//!
//! - [`LocalStore`]: names map 1:1 to files under a configured root directory
//! - [`RemoteStore`]: names map to objects in a configured bucket, reached
//!   through `object_store`
//!
//! The store is also the sole authority for producing a locally readable
//! path for a named artifact ([`SnapshotStore::local_path`]). The local
//! backend hands out the stored path after confirming it is readable; the
//! remote backend downloads the object into a temporary file wrapped in a
//! [`LocalCopy`] guard that removes it on drop.

mod config;
mod error;
mod local;
mod remote;
mod store;

pub use config::{RemoteConfig, StoreConfig, build_store};
pub use error::StoreError;
pub use local::LocalStore;
pub use remote::RemoteStore;
pub use store::{LocalCopy, SNAPSHOT_SUFFIX, SnapshotReader, SnapshotStore};

/// Result type for storage operations
pub type Result<T> = std::result::Result<T, StoreError>;
