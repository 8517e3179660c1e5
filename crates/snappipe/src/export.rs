use chrono::{DateTime, Utc};
use diagnostics::log_info;
use serde::Serialize;
use snapstore::SnapshotStore;

use crate::encode::encode_snapshot;
use crate::naming::{SnapshotFormat, snapshot_name};
use crate::record::{RecordFilter, RecordSource};
use crate::Result;

/// What an export produced: the generated snapshot name, its creation
/// instant, and the backend-reported storage location.
#[derive(Debug, Clone, Serialize)]
pub struct ExportOutcome {
    pub file: String,
    pub created_utc: DateTime<Utc>,
    pub location: String,
}

/// Fetch filtered records, encode them into a snapshot, and persist it.
///
/// Zero fetched records is not an error; the export still produces a valid
/// empty snapshot. Encoding failures abort before anything reaches storage,
/// so a failed export leaves no partial artifact behind.
pub async fn run_export(
    source: &dyn RecordSource,
    store: &dyn SnapshotStore,
    filter: &RecordFilter,
    format: SnapshotFormat,
) -> Result<ExportOutcome> {
    let records = source.fetch(filter).await?;
    let content = encode_snapshot(format, &records)?;

    let created_utc = Utc::now();
    let file = snapshot_name(created_utc, format);
    let location = store.save(&file, content).await?;

    log_info!("exported {count} records to {file}", count: records.len(), file: file);
    Ok(ExportOutcome {
        file,
        created_utc,
        location,
    })
}
