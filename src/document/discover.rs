//! Resolves the configured file pattern to concrete documents

use std::path::PathBuf;

use crate::common::{Error, Result};

/// Resolve a glob pattern or literal path to an ordered document list.
///
/// A glob matching nothing yields an empty list (the run simply has zero
/// outcomes). A literal path names a specific document, so its absence is
/// a discovery error.
pub fn discover(pattern: &str) -> Result<Vec<PathBuf>> {
    if !contains_glob_chars(pattern) {
        let path = PathBuf::from(pattern);
        if !path.is_file() {
            return Err(Error::Discovery(pattern.to_string()));
        }
        return Ok(vec![path]);
    }

    let entries = glob::glob(pattern).map_err(|e| Error::InvalidPattern {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })?;

    let mut paths: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .filter(|path| path.is_file())
        .collect();
    paths.sort();

    tracing::debug!(pattern, count = paths.len(), "discovered documents");
    Ok(paths)
}

fn contains_glob_chars(pattern: &str) -> bool {
    pattern.contains(['*', '?', '['])
}
