//! Core types for the change-detection system.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// RelativePath: slash-normalized path relative to the synchronized root
pub type RelativePath = String;

/// ContentHash: lowercase hex BLAKE3 digest of a file's raw bytes
pub type ContentHash = String;

/// NodeId: lowercase hex BLAKE3 digest of a fingerprint node's content
pub type NodeId = String;

/// FileState: one entry per tracked file, iterated in path order
pub type FileState = BTreeMap<RelativePath, ContentHash>;

/// Paths that changed between two scans of the same root.
///
/// Each list is sorted by path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileChanges {
    pub added: Vec<RelativePath>,
    pub removed: Vec<RelativePath>,
    pub modified: Vec<RelativePath>,
}

impl FileChanges {
    /// Exact set difference between two file states.
    pub fn between(old: &FileState, new: &FileState) -> Self {
        let mut changes = FileChanges::default();

        for (path, hash) in new {
            match old.get(path) {
                None => changes.added.push(path.clone()),
                Some(old_hash) if old_hash != hash => changes.modified.push(path.clone()),
                Some(_) => {}
            }
        }

        changes.removed = old
            .keys()
            .filter(|path| !new.contains_key(*path))
            .cloned()
            .collect();

        changes
    }

    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.modified.is_empty()
    }

    /// Total number of changed paths
    pub fn len(&self) -> usize {
        self.added.len() + self.removed.len() + self.modified.len()
    }
}
