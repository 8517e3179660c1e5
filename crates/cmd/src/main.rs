use std::env;
use std::path::PathBuf;

use anyhow::{Result, anyhow};
use clap::{Args, Parser, Subcommand, ValueEnum};
use snappipe::{
    MemoryRecordSource, RecordFilter, RecordSource, SnapshotFormat, run_export, run_query,
};
use snapstore::{RemoteConfig, SnapshotStore, StoreConfig, build_store};

#[derive(Parser)]
#[command(author, version, about = "Export records to columnar snapshots and query them with SQL", long_about = None)]
#[command(name = "coldsnap")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Storage location: a local directory or an s3:// bucket URL.
    /// Falls back to COLDSNAP_STORE, then "storage/parquet".
    #[arg(long, global = true)]
    store: Option<String>,

    /// JSON file backing the record source (array of records).
    /// Falls back to COLDSNAP_DATA.
    #[arg(long, global = true)]
    data: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// List records matching the filters
    Records(FilterArgs),
    /// Export filtered records to a snapshot and store it
    Export {
        #[command(flatten)]
        filter: FilterArgs,
        /// Snapshot encoding to write
        #[arg(long, value_enum, default_value_t = FormatArg::Parquet)]
        format: FormatArg,
    },
    /// List stored snapshot names, newest first
    Files,
    /// Run a SQL template against the snapshot matching a date token
    Query {
        /// Date embedded in the snapshot name (2025-11-02 or 20251102)
        #[arg(long)]
        date: String,
        /// SQL template; reference the snapshot as {{file}} or "FROM parquet"
        #[arg(long)]
        sql: String,
    },
}

#[derive(Args)]
struct FilterArgs {
    /// Keep records whose name contains this substring (case-insensitive)
    #[arg(long)]
    name: Option<String>,

    /// Keep records priced at or above this value
    #[arg(long)]
    min_price: Option<f64>,

    /// Keep records priced at or below this value
    #[arg(long)]
    max_price: Option<f64>,
}

impl FilterArgs {
    fn into_filter(self) -> RecordFilter {
        RecordFilter {
            name_contains: self.name,
            min_price: self.min_price,
            max_price: self.max_price,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Parquet,
    Csv,
}

impl From<FormatArg> for SnapshotFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Parquet => SnapshotFormat::Parquet,
            FormatArg::Csv => SnapshotFormat::Csv,
        }
    }
}

fn store_location(cli_store: Option<String>) -> String {
    cli_store
        .or_else(|| env::var("COLDSNAP_STORE").ok())
        .unwrap_or_else(|| "storage/parquet".to_string())
}

/// Remote credentials come from the environment, read once at startup.
fn remote_config_from_env() -> RemoteConfig {
    RemoteConfig {
        url: String::new(),
        region: env::var("COLDSNAP_S3_REGION").unwrap_or_default(),
        access_key: env::var("COLDSNAP_S3_ACCESS_KEY").unwrap_or_default(),
        secret_key: env::var("COLDSNAP_S3_SECRET_KEY").unwrap_or_default(),
        endpoint: env::var("COLDSNAP_S3_ENDPOINT").unwrap_or_default(),
    }
}

fn load_source(data: Option<PathBuf>) -> Result<MemoryRecordSource> {
    let path = data
        .or_else(|| env::var("COLDSNAP_DATA").ok().map(PathBuf::from))
        .ok_or_else(|| anyhow!("no record data configured; pass --data or set COLDSNAP_DATA"))?;
    Ok(MemoryRecordSource::from_json_file(path)?)
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    diagnostics::init_diagnostics();
    let cli = Cli::parse();

    let location = store_location(cli.store);
    let config = StoreConfig::from_location(&location, remote_config_from_env());
    let store: std::sync::Arc<dyn SnapshotStore> = build_store(&config)?;

    match cli.command {
        Commands::Records(filter) => {
            let source = load_source(cli.data)?;
            let records = source.fetch(&filter.into_filter()).await?;
            print_json(&records)?;
        }
        Commands::Export { filter, format } => {
            let source = load_source(cli.data)?;
            let outcome = run_export(
                &source,
                store.as_ref(),
                &filter.into_filter(),
                format.into(),
            )
            .await?;
            print_json(&outcome)?;
        }
        Commands::Files => {
            let mut names = store.list().await?;
            names.sort_by(|a, b| b.cmp(a));
            print_json(&names)?;
        }
        Commands::Query { date, sql } => {
            let outcome = run_query(store.as_ref(), &date, &sql).await?;
            print_json(&outcome)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_location_prefers_explicit_flag() {
        assert_eq!(store_location(Some("/data/snaps".to_string())), "/data/snaps");
    }

    #[test]
    fn filter_args_map_onto_record_filter() {
        let args = FilterArgs {
            name: Some("widget".to_string()),
            min_price: Some(1.0),
            max_price: None,
        };
        let filter = args.into_filter();
        assert_eq!(filter.name_contains.as_deref(), Some("widget"));
        assert_eq!(filter.min_price, Some(1.0));
        assert_eq!(filter.max_price, None);
    }

    #[tokio::test]
    async fn load_source_reads_json_data() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        write!(
            file,
            r#"[{{"id":"1","name":"widget","price":9.5,"created_at_utc":"2025-11-01T10:00:00Z"}}]"#
        )
        .expect("write");

        let source = load_source(Some(file.path().to_path_buf())).expect("load");
        let records = source.fetch(&RecordFilter::default()).await.expect("fetch");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "widget");
    }

    #[test]
    fn missing_data_configuration_is_an_error() {
        // Only meaningful when COLDSNAP_DATA is unset, as in CI.
        if env::var("COLDSNAP_DATA").is_err() {
            assert!(load_source(None).is_err());
        }
    }
}
