//! Path canonicalization and relative-path normalization

use crate::error::SyncError;
use crate::types::RelativePath;
use std::path::{Component, Path, PathBuf};
use unicode_normalization::UnicodeNormalization;

/// Canonicalize a synchronized root (resolves symlinks, `..` and `.`).
///
/// The result is the path as the filesystem spells it and is what scans walk. Use
/// [`snapshot_key`] for anything that must be stable across Unicode spellings.
pub fn canonicalize_path(path: &Path) -> Result<PathBuf, SyncError> {
    // dunce avoids UNC prefixes on Windows
    dunce::canonicalize(path).map_err(|e| {
        SyncError::InvalidPath(format!(
            "Failed to canonicalize {}: {}",
            path.display(),
            e
        ))
    })
}

/// Spelling-independent key for a root path: NFC, no trailing slash.
pub fn snapshot_key(root: &Path) -> String {
    normalize_path_string(&root.to_string_lossy())
}

/// Normalize a path string without touching the filesystem: NFC, no trailing slash.
pub fn normalize_path_string(path: &str) -> String {
    let mut result: String = path.nfc().collect();
    if result.len() > 1 {
        while result.ends_with('/') || result.ends_with('\\') {
            result.pop();
        }
    }
    result
}

/// Express `path` relative to `root` as a slash-separated string.
///
/// Returns `None` when `path` is not under `root`. The root itself maps to `""`.
pub fn relative_path(root: &Path, path: &Path) -> Option<RelativePath> {
    let stripped = path.strip_prefix(root).ok()?;
    let segments: Vec<String> = stripped
        .components()
        .filter_map(|component| match component {
            Component::Normal(name) => Some(name.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();
    Some(segments.join("/"))
}
