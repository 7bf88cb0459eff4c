//! Payload presence checks for version folders

use std::fs;
use std::path::Path;
use tracing::debug;
use walkdir::WalkDir;

/// True when `version_dir` holds no payload.
///
/// A version folder is non-empty only when at least one of its immediate
/// sub-directories (the AOV folders) contains a file with `extension`
/// somewhere below it. Files sitting directly in `version_dir` do not count.
/// Unreadable or missing folders count as empty.
pub fn is_empty_version(version_dir: &Path, extension: &str) -> bool {
    let entries = match fs::read_dir(version_dir) {
        Ok(entries) => entries,
        Err(err) => {
            debug!(path = %version_dir.display(), error = %err, "Cannot read version folder");
            return true;
        }
    };

    for entry in entries.filter_map(|e| e.ok()) {
        let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
        if is_dir && contains_payload(&entry.path(), extension) {
            return false;
        }
    }
    true
}

/// True when any file below `dir` has `extension`. Stops at the first match.
pub fn contains_payload(dir: &Path, extension: &str) -> bool {
    WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .any(|entry| entry.file_type().is_file() && has_extension(entry.path(), extension))
}

/// Case-insensitive extension match; a leading dot in `extension` is ignored.
pub fn has_extension(path: &Path, extension: &str) -> bool {
    let wanted = extension.trim_start_matches('.');
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case(wanted))
        .unwrap_or(false)
}
