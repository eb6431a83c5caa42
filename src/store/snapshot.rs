//! Snapshot persistence
//!
//! One JSON document per synchronized root, named by the BLAKE3 digest of the canonical root
//! path. Writes go to a temporary file which is then renamed over the snapshot, so readers see
//! either the old or the new document.
//!
//! Two processes saving snapshots for the same root race; the last rename wins.

use crate::config::xdg;
use crate::error::SyncError;
use crate::merkle::{MerkleDag, SerializedDag};
use crate::tree::{hasher, path};
use crate::types::{ContentHash, FileState, RelativePath};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

const SNAPSHOT_VERSION: u32 = 1;
const SNAPSHOT_EXTENSION: &str = "json";

/// On-disk snapshot document
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SnapshotDocument {
    version: u32,
    root: PathBuf,
    saved_at: DateTime<Utc>,
    file_hashes: Vec<(RelativePath, ContentHash)>,
    merkle_dag: SerializedDag,
}

/// Reads and writes the snapshot of one synchronized root
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    root: PathBuf,
    path: PathBuf,
}

impl SnapshotStore {
    /// Store for `root` under the default snapshot directory
    pub fn for_root(root: &Path) -> Result<Self, SyncError> {
        Self::in_dir(&xdg::snapshots_dir()?, root)
    }

    /// Store for `root` under an explicit snapshot directory
    pub fn in_dir(snapshot_dir: &Path, root: &Path) -> Result<Self, SyncError> {
        let root = path::canonicalize_path(root)?;
        let path = Self::path_in(snapshot_dir, &root);
        Ok(Self { root, path })
    }

    /// Deterministic snapshot location for an already canonical root
    ///
    /// Named after the NFC form of the root, so both Unicode spellings of a root share a snapshot.
    pub fn path_in(snapshot_dir: &Path, canonical_root: &Path) -> PathBuf {
        let digest = hasher::compute_content_hash(path::snapshot_key(canonical_root).as_bytes());
        snapshot_dir.join(format!("{}.{}", digest, SNAPSHOT_EXTENSION))
    }

    /// Snapshot location for `root` under the default snapshot directory
    pub fn path_for(root: &Path) -> Result<PathBuf, SyncError> {
        Ok(Self::for_root(root)?.path)
    }

    /// Canonical root this store belongs to
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Location of the snapshot file
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Persist a file state and its fingerprint atomically.
    pub fn save(&self, files: &FileState, dag: &MerkleDag) -> Result<(), SyncError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let document = SnapshotDocument {
            version: SNAPSHOT_VERSION,
            root: self.root.clone(),
            saved_at: Utc::now(),
            file_hashes: files
                .iter()
                .map(|(path, hash)| (path.clone(), hash.clone()))
                .collect(),
            merkle_dag: dag.serialize(),
        };
        let serialized = serde_json::to_vec_pretty(&document)?;

        let temp_path = self.path.with_extension("json.tmp");
        fs::write(&temp_path, &serialized)?;
        fs::rename(&temp_path, &self.path).map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            SyncError::Io(e)
        })?;

        debug!(
            path = %self.path.display(),
            file_count = files.len(),
            "Saved snapshot"
        );
        Ok(())
    }

    /// Load the persisted file state and fingerprint.
    ///
    /// Fails with [`SyncError::SnapshotNotFound`] when no snapshot has been saved yet.
    pub fn load(&self) -> Result<(FileState, MerkleDag), SyncError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(SyncError::SnapshotNotFound(self.path.clone()));
            }
            Err(e) => return Err(SyncError::Io(e)),
        };

        let document: SnapshotDocument =
            serde_json::from_slice(&bytes).map_err(|e| self.corrupt(e.to_string()))?;

        if document.version != SNAPSHOT_VERSION {
            return Err(self.corrupt(format!(
                "unsupported version {}",
                document.version
            )));
        }
        if document.root != self.root {
            return Err(self.corrupt(format!(
                "snapshot belongs to {}",
                document.root.display()
            )));
        }

        let files: FileState = document.file_hashes.into_iter().collect();
        let dag = MerkleDag::deserialize(document.merkle_dag)
            .map_err(|e| self.corrupt(e.to_string()))?;

        debug!(
            path = %self.path.display(),
            file_count = files.len(),
            saved_at = %document.saved_at,
            "Loaded snapshot"
        );
        Ok((files, dag))
    }

    /// Remove this store's snapshot. A missing file is not an error.
    pub fn delete(&self) -> Result<(), SyncError> {
        remove_snapshot_file(&self.path)
    }

    /// Remove the default-location snapshot for `root`. A missing file is not an error.
    pub fn delete_for_root(root: &Path) -> Result<(), SyncError> {
        Self::delete_in(&xdg::snapshots_dir()?, root)
    }

    /// Remove the snapshot for `root` under an explicit snapshot directory.
    ///
    /// A root that no longer exists cannot be canonicalized; its absolute form is used instead,
    /// named the same way as on save.
    pub fn delete_in(snapshot_dir: &Path, root: &Path) -> Result<(), SyncError> {
        let canonical_root = match path::canonicalize_path(root) {
            Ok(canonical) => canonical,
            Err(_) => std::path::absolute(root)?,
        };
        remove_snapshot_file(&Self::path_in(snapshot_dir, &canonical_root))
    }

    fn corrupt(&self, reason: String) -> SyncError {
        SyncError::SnapshotCorrupt {
            path: self.path.clone(),
            reason,
        }
    }
}

fn remove_snapshot_file(path: &Path) -> Result<(), SyncError> {
    match fs::remove_file(path) {
        Ok(()) => {
            debug!(path = %path.display(), "Deleted snapshot");
            Ok(())
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(SyncError::Io(e)),
    }
}
