use chrono::{DateTime, Utc};
use snapstore::SNAPSHOT_SUFFIX;

/// Snapshot encoding variants and their name suffixes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotFormat {
    Parquet,
    Csv,
}

impl SnapshotFormat {
    pub fn suffix(&self) -> &'static str {
        match self {
            SnapshotFormat::Parquet => SNAPSHOT_SUFFIX,
            SnapshotFormat::Csv => ".csv",
        }
    }
}

/// Generate a snapshot name embedding the creation instant at second
/// precision: `items_20251102_090000_UTC.parquet`.
///
/// The timestamp fields are zero-padded so lexicographic order over full
/// names equals chronological order; the resolver's tie-break relies on it.
/// Two exports within the same second collide and overwrite, which the
/// stores tolerate.
pub fn snapshot_name(created_at: DateTime<Utc>, format: SnapshotFormat) -> String {
    format!(
        "items_{}_UTC{}",
        created_at.format("%Y%m%d_%H%M%S"),
        format.suffix()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn name_embeds_instant_and_suffix() {
        let at = Utc.with_ymd_and_hms(2025, 11, 2, 9, 0, 0).single().expect("valid instant");
        assert_eq!(
            snapshot_name(at, SnapshotFormat::Parquet),
            "items_20251102_090000_UTC.parquet"
        );
        assert_eq!(
            snapshot_name(at, SnapshotFormat::Csv),
            "items_20251102_090000_UTC.csv"
        );
    }

    #[test]
    fn lexicographic_order_tracks_chronology() {
        let earlier = Utc.with_ymd_and_hms(2025, 11, 1, 10, 0, 0).single().expect("valid instant");
        let later = Utc.with_ymd_and_hms(2025, 11, 2, 9, 0, 0).single().expect("valid instant");
        let a = snapshot_name(earlier, SnapshotFormat::Parquet);
        let b = snapshot_name(later, SnapshotFormat::Parquet);
        assert!(a < b);
    }
}
