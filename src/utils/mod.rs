//! Small helpers shared by the CLI and the I/O layer.

use std::path::{Path, PathBuf};

use crate::error::{DocMergeError, Result};
use crate::io::PdfReader;

/// Expand shell-style patterns into existing file paths, in pattern order.
///
/// A pattern without glob metacharacters is taken literally, so a missing
/// file is reported as [`DocMergeError::FileNotFound`] instead of silently
/// matching nothing.
pub fn collect_paths_for_patterns<T>(patterns: T) -> Result<Vec<PathBuf>>
where
    T: IntoIterator,
    T::Item: AsRef<str>,
{
    let mut resolved = Vec::new();
    for pattern in patterns {
        resolved.extend(collect_paths_for_pattern(pattern.as_ref())?);
    }
    Ok(resolved)
}

fn collect_paths_for_pattern(pattern: &str) -> Result<Vec<PathBuf>> {
    if !pattern.contains(['*', '?', '[']) {
        let path = PathBuf::from(pattern);
        PdfReader::check_path_exists(&path)?;
        return Ok(vec![path]);
    }

    let entries = glob::glob(pattern).map_err(|err| DocMergeError::other(err.to_string()))?;

    let mut paths = Vec::new();
    for entry in entries {
        let path = entry.map_err(|err| DocMergeError::other(err.to_string()))?;
        if path.is_file() {
            paths.push(path);
        }
    }

    if paths.is_empty() {
        return Err(DocMergeError::file_not_found(PathBuf::from(pattern)));
    }

    Ok(paths)
}

/// Read an input list: one path per line, `#` comments and blank lines ignored.
pub fn read_input_list(path: &Path) -> Result<Vec<String>> {
    let content =
        std::fs::read_to_string(path).map_err(|source| DocMergeError::FailedToReadInputList {
            path: path.to_path_buf(),
            source,
        })?;

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect())
}

/// Format file size as human-readable string.
pub fn format_file_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{size} bytes")
    }
}
