use chrono::{DateTime, Utc};
use diagnostics::{log_debug, log_info};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use snapstore::SnapshotStore;

use crate::resolve::resolve_snapshot;
use crate::rewrite::rewrite_sql;
use crate::{PipelineError, Result};

/// Dynamically typed scalar produced by the analytical engine.
///
/// Serializes untagged: null, string, number, or RFC 3339 timestamp.
/// Engine values outside this union (booleans, blobs, nested types) are
/// rendered as text, best effort.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ScalarValue {
    Null,
    Text(String),
    Number(f64),
    Timestamp(DateTime<Utc>),
}

/// One result row: an ordered mapping from column name to scalar value.
/// Lookup by name is case-insensitive; iteration preserves the projection
/// order the engine produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    columns: Vec<(String, ScalarValue)>,
}

impl Row {
    pub fn push(&mut self, name: impl Into<String>, value: ScalarValue) {
        self.columns.push((name.into(), value));
    }

    pub fn get(&self, name: &str) -> Option<&ScalarValue> {
        self.columns
            .iter()
            .find(|(column, _)| column.eq_ignore_ascii_case(name))
            .map(|(_, value)| value)
    }

    pub fn columns(&self) -> impl Iterator<Item = (&str, &ScalarValue)> {
        self.columns
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (name, value) in &self.columns {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Result of a query request: the snapshot it ran against plus the rows in
/// engine-native order.
#[derive(Debug, Serialize)]
pub struct QueryOutcome {
    pub file: String,
    pub rows: Vec<Row>,
}

/// Run an ad-hoc SQL template against the snapshot matching a date token.
///
/// Steps are strictly sequential: validate inputs, list the store, resolve
/// the token, obtain a locally readable copy, rewrite the template, execute
/// on a fresh in-memory engine. Validation happens before any storage
/// access. A materialized remote copy lives exactly as long as this call.
pub async fn run_query(
    store: &dyn SnapshotStore,
    date_token: &str,
    sql: &str,
) -> Result<QueryOutcome> {
    if date_token.trim().is_empty() {
        return Err(PipelineError::validation("date is required"));
    }
    if sql.trim().is_empty() {
        return Err(PipelineError::validation("sql is required"));
    }

    let names = store.list().await?;
    if names.is_empty() {
        return Err(PipelineError::not_found("no snapshots exist"));
    }

    let file = resolve_snapshot(date_token, &names)?;

    // The guard keeps a materialized remote copy alive through execution and
    // deletes it when dropped, on success and failure paths alike.
    let local = store.local_path(&file).await?;
    let path = local.path().to_string_lossy().into_owned();

    let executable = rewrite_sql(sql, &path);
    log_debug!("rewritten SQL: {executable}", executable: executable);

    // The engine is synchronous; keep it off the async worker threads.
    let rows = tokio::task::spawn_blocking(move || execute_sql(&executable))
        .await
        .map_err(|e| PipelineError::QueryExecution(e.to_string()))??;
    drop(local);

    log_info!("query over {file} returned {count} rows", file: file, count: rows.len());
    Ok(QueryOutcome { file, rows })
}

/// Execute SQL once on a fresh, isolated in-memory engine instance.
///
/// Engine failures are deterministic given fixed inputs, so they surface
/// verbatim with no retry.
fn execute_sql(sql: &str) -> Result<Vec<Row>> {
    let conn = duckdb::Connection::open_in_memory().map_err(engine_error)?;
    let mut stmt = conn.prepare(sql).map_err(engine_error)?;
    let mut rows = stmt.query([]).map_err(engine_error)?;

    let mut out = Vec::new();
    while let Some(row) = rows.next().map_err(engine_error)? {
        let stmt: &duckdb::Statement<'_> = row.as_ref();
        let mut result_row = Row::default();
        for (idx, name) in stmt.column_names().into_iter().enumerate() {
            let value: duckdb::types::Value = row.get(idx).map_err(engine_error)?;
            result_row.push(name, scalar_from_engine(value));
        }
        out.push(result_row);
    }
    Ok(out)
}

fn engine_error(err: duckdb::Error) -> PipelineError {
    PipelineError::QueryExecution(err.to_string())
}

fn scalar_from_engine(value: duckdb::types::Value) -> ScalarValue {
    use duckdb::types::Value;

    match value {
        Value::Null => ScalarValue::Null,
        Value::Boolean(v) => ScalarValue::Text(v.to_string()),
        Value::TinyInt(v) => ScalarValue::Number(f64::from(v)),
        Value::SmallInt(v) => ScalarValue::Number(f64::from(v)),
        Value::Int(v) => ScalarValue::Number(f64::from(v)),
        Value::BigInt(v) => ScalarValue::Number(v as f64),
        Value::HugeInt(v) => ScalarValue::Number(v as f64),
        Value::UTinyInt(v) => ScalarValue::Number(f64::from(v)),
        Value::USmallInt(v) => ScalarValue::Number(f64::from(v)),
        Value::UInt(v) => ScalarValue::Number(f64::from(v)),
        Value::UBigInt(v) => ScalarValue::Number(v as f64),
        Value::Float(v) => ScalarValue::Number(f64::from(v)),
        Value::Double(v) => ScalarValue::Number(v),
        Value::Decimal(v) => v
            .to_string()
            .parse::<f64>()
            .map(ScalarValue::Number)
            .unwrap_or_else(|_| ScalarValue::Text(v.to_string())),
        Value::Timestamp(unit, raw) => timestamp_scalar(unit, raw),
        Value::Date32(days) => DateTime::from_timestamp(i64::from(days) * 86_400, 0)
            .map(ScalarValue::Timestamp)
            .unwrap_or(ScalarValue::Null),
        Value::Text(v) => ScalarValue::Text(v),
        other => ScalarValue::Text(format!("{other:?}")),
    }
}

fn timestamp_scalar(unit: duckdb::types::TimeUnit, raw: i64) -> ScalarValue {
    use duckdb::types::TimeUnit;

    let micros = match unit {
        TimeUnit::Second => raw.checked_mul(1_000_000),
        TimeUnit::Millisecond => raw.checked_mul(1_000),
        TimeUnit::Microsecond => Some(raw),
        TimeUnit::Nanosecond => Some(raw / 1_000),
    };
    micros
        .and_then(DateTime::from_timestamp_micros)
        .map(ScalarValue::Timestamp)
        .unwrap_or(ScalarValue::Null)
}
