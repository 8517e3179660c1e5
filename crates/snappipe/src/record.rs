use std::path::Path;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{PipelineError, Result};

/// An operational record as it enters the pipeline.
///
/// Timestamps are normalized to UTC at this boundary and never left
/// ambiguous downstream. Identity is the `id` field; a fetch batch may
/// contain duplicates and the pipeline must not drop them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    pub name: String,
    pub price: f64,
    pub created_at_utc: DateTime<Utc>,
}

/// Conjunctive record predicates: case-insensitive name substring plus
/// inclusive price bounds.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordFilter {
    pub name_contains: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
}

impl RecordFilter {
    pub fn matches(&self, record: &Record) -> bool {
        if let Some(needle) = &self.name_contains {
            if !record
                .name
                .to_lowercase()
                .contains(&needle.to_lowercase())
            {
                return false;
            }
        }
        if let Some(min) = self.min_price {
            if record.price < min {
                return false;
            }
        }
        if let Some(max) = self.max_price {
            if record.price > max {
                return false;
            }
        }
        true
    }
}

/// Read-only record producer consumed by the export path.
///
/// Implementations apply all provided filters conjunctively and preserve
/// their native ordering.
#[async_trait]
pub trait RecordSource: Send + Sync {
    async fn fetch(&self, filter: &RecordFilter) -> Result<Vec<Record>>;
}

/// In-memory record source backed by a fixed record set.
#[derive(Debug)]
pub struct MemoryRecordSource {
    records: Vec<Record>,
}

impl MemoryRecordSource {
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    /// Load a record set from a JSON array file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|e| {
            PipelineError::Source(format!(
                "failed to open record data at {}: {e}",
                path.display()
            ))
        })?;
        let records = serde_json::from_reader(file).map_err(|e| {
            PipelineError::Source(format!(
                "failed to parse record data at {}: {e}",
                path.display()
            ))
        })?;
        Ok(Self::new(records))
    }
}

#[async_trait]
impl RecordSource for MemoryRecordSource {
    async fn fetch(&self, filter: &RecordFilter) -> Result<Vec<Record>> {
        Ok(self
            .records
            .iter()
            .filter(|record| filter.matches(record))
            .cloned()
            .collect())
    }
}
