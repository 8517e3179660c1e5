use crate::{PipelineError, Result};

/// Map a caller-supplied date token to the most recent matching snapshot
/// name.
///
/// Accepts both the hyphenated calendar form (`2025-11-02`) and the compact
/// digit form (`20251102`) as equivalent: hyphens are stripped before
/// matching. Matching is a case-insensitive substring test over the full
/// name; ties go to the lexicographically greatest name, which is the
/// chronologically latest because snapshot timestamps are zero-padded.
///
/// Never falls back to "most recent snapshot" when nothing matches; that
/// would silently answer a different question than asked.
pub fn resolve_snapshot(date_token: &str, names: &[String]) -> Result<String> {
    let token = date_token.trim();
    let normalized = token.replace('-', "").to_lowercase();
    if normalized.is_empty() {
        return Err(PipelineError::validation("date token must not be blank"));
    }

    names
        .iter()
        .filter(|name| name.to_lowercase().contains(&normalized))
        .max()
        .cloned()
        .ok_or_else(|| {
            PipelineError::not_found(format!(
                "no snapshot name contains date '{date_token}'"
            ))
        })
}
