//! Recursive content hashing of a directory tree

use crate::error::SyncError;
use crate::ignore::IgnoreMatcher;
use crate::tree::{hasher, path};
use crate::types::FileState;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, instrument, warn};
use walkdir::{DirEntry, WalkDir};

/// Walks a synchronized root and hashes every tracked file.
///
/// Ignored entries are decided from the lister's reported type before any further I/O, so
/// ignored subtrees are never stat'ed or descended. Per-entry I/O failures are logged and the
/// entry is left out of the result.
pub struct TreeHasher<'a> {
    root: PathBuf,
    matcher: &'a IgnoreMatcher,
}

impl<'a> TreeHasher<'a> {
    /// Create a hasher for `root` using `matcher` to skip ignored paths
    pub fn new(root: impl Into<PathBuf>, matcher: &'a IgnoreMatcher) -> Self {
        Self {
            root: root.into(),
            matcher,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Scan the tree and return the path -> hash mapping.
    ///
    /// Only [`SyncError::HashDirectory`] aborts a scan.
    #[instrument(skip(self), fields(root = %self.root.display()))]
    pub fn scan(&self) -> Result<FileState, SyncError> {
        let start = Instant::now();
        let mut files = FileState::new();
        let mut skipped = 0usize;

        let mut entries = WalkDir::new(&self.root)
            .follow_links(false)
            .min_depth(1)
            .into_iter()
            .filter_entry(|entry| !self.ignored_as_listed(entry));

        while let Some(next) = entries.next() {
            let entry = match next {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(
                        path = ?e.path(),
                        error = %e,
                        "Skipping unreadable entry"
                    );
                    skipped += 1;
                    continue;
                }
            };

            let Some(relative) = path::relative_path(&self.root, entry.path()) else {
                continue;
            };

            // The lister may report a wrong or unknown type; confirm before descending or hashing
            let metadata = match std::fs::symlink_metadata(entry.path()) {
                Ok(metadata) => metadata,
                Err(e) => {
                    warn!(path = %relative, error = %e, "Failed to stat entry, skipping");
                    if entry.file_type().is_dir() {
                        entries.skip_current_dir();
                    }
                    skipped += 1;
                    continue;
                }
            };

            let file_type = metadata.file_type();
            if self.matcher.is_ignored(&relative, file_type.is_dir()) {
                if entry.file_type().is_dir() {
                    entries.skip_current_dir();
                }
                continue;
            }

            if file_type.is_dir() {
                continue;
            }

            if !file_type.is_file() {
                debug!(path = %relative, "Skipping non-regular entry");
                continue;
            }

            match hasher::hash_file(entry.path()) {
                Ok(hash) => {
                    files.insert(relative, hash);
                }
                Err(SyncError::HashDirectory(path)) => {
                    return Err(SyncError::HashDirectory(path));
                }
                Err(e) => {
                    warn!(path = %relative, error = %e, "Failed to hash file, skipping");
                    skipped += 1;
                }
            }
        }

        info!(
            file_count = files.len(),
            skipped,
            duration_ms = start.elapsed().as_millis(),
            "Scan completed"
        );

        Ok(files)
    }

    fn ignored_as_listed(&self, entry: &DirEntry) -> bool {
        match path::relative_path(&self.root, entry.path()) {
            Some(relative) => self
                .matcher
                .is_ignored(&relative, entry.file_type().is_dir()),
            None => false,
        }
    }
}
