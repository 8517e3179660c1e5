//! Export-and-query pipeline over snapshot storage.
//!
//! The export path fetches filtered records from a [`RecordSource`], encodes
//! them into an immutable snapshot under a fixed four-column schema, and
//! persists the result through a [`snapstore::SnapshotStore`]. The query
//! path resolves a caller date token to a stored snapshot name, obtains a
//! locally readable copy, rewrites the caller's SQL template to bind its
//! virtual table reference to the physical file, and executes it on a fresh
//! in-memory DuckDB instance.
//!
//! Within a request the steps are strictly sequential (fetch → encode →
//! persist; list → resolve → materialize → rewrite → execute). Across
//! requests nothing is shared except the store's own content.

mod encode;
mod error;
mod export;
mod naming;
mod record;
mod resolve;
mod rewrite;
mod query;

pub use encode::{encode_snapshot, records_to_batch, snapshot_schema};
pub use error::PipelineError;
pub use export::{ExportOutcome, run_export};
pub use naming::{SnapshotFormat, snapshot_name};
pub use record::{MemoryRecordSource, Record, RecordFilter, RecordSource};
pub use resolve::resolve_snapshot;
pub use rewrite::{FILE_TOKEN, rewrite_sql};
pub use query::{QueryOutcome, Row, ScalarValue, run_query};

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, PipelineError>;
