use std::sync::LazyLock;

use regex::{NoExpand, Regex};

/// Reserved marker a SQL template may embed where the snapshot file should
/// be bound. Matched case-insensitively; every occurrence is replaced.
pub const FILE_TOKEN: &str = "{{file}}";

static FILE_TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\{\{file\}\}").expect("static pattern"));

static FROM_PARQUET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bfrom\s+parquet\b").expect("static pattern"));

fn read_parquet_call(path: &str) -> String {
    // Single quotes in the path are escaped by doubling. The path comes from
    // the resolver over store-listed names, but it is escaped regardless.
    format!("read_parquet('{}')", path.replace('\'', "''"))
}

/// Rewrite a SQL template so its virtual table reference becomes a concrete
/// `read_parquet` call over `parquet_path`.
///
/// Two mutually exclusive modes, chosen by inspecting the template:
///
/// 1. Explicit: if [`FILE_TOKEN`] occurs, every occurrence is replaced.
/// 2. Implicit: otherwise, each `FROM parquet` reference (case-insensitive,
///    word-boundary-delimited) is substituted.
///
/// This is textual substitution, not a SQL parser. A template with no
/// recognizable reference passes through unchanged and surfaces downstream
/// as a missing-table error from the engine rather than a rewrite error.
pub fn rewrite_sql(template: &str, parquet_path: &str) -> String {
    let call = read_parquet_call(parquet_path);
    if FILE_TOKEN_RE.is_match(template) {
        return FILE_TOKEN_RE
            .replace_all(template, NoExpand(&call))
            .into_owned();
    }
    let from_call = format!("FROM {call}");
    FROM_PARQUET_RE
        .replace_all(template, NoExpand(&from_call))
        .into_owned()
}
