//! Change detection for one synchronized root
//!
//! A [`Synchronizer`] holds the last known file state and fingerprint of a root. Each check
//! rescans the tree, compares fingerprints, and only when they differ computes the exact
//! per-path diff and persists a new snapshot.

use crate::config::SyncConfig;
use crate::error::SyncError;
use crate::ignore::{normalize_relative_path, IgnoreMatcher};
use crate::merkle::MerkleDag;
use crate::store::SnapshotStore;
use crate::tree::TreeHasher;
use crate::types::{ContentHash, FileChanges, FileState};
use std::path::Path;
use tracing::{debug, info, instrument};

/// In-memory state held once initialized
#[derive(Debug, Clone)]
struct SyncState {
    files: FileState,
    dag: MerkleDag,
}

/// Detects added, removed and modified files under one root.
///
/// Not designed for concurrent use; mutating calls take `&mut self`.
#[derive(Debug)]
pub struct Synchronizer {
    matcher: IgnoreMatcher,
    store: SnapshotStore,
    state: Option<SyncState>,
}

impl Synchronizer {
    /// Synchronizer for `root` with snapshots in the default per-user directory
    pub fn new<I, S>(root: &Path, ignore_patterns: I) -> Result<Self, SyncError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Ok(Self::with_store(
            SnapshotStore::for_root(root)?,
            ignore_patterns,
        ))
    }

    /// Synchronizer using an explicit snapshot store
    pub fn with_store<I, S>(store: SnapshotStore, ignore_patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            matcher: IgnoreMatcher::new(ignore_patterns),
            store,
            state: None,
        }
    }

    /// Synchronizer configured from a loaded [`SyncConfig`]
    pub fn from_config(root: &Path, config: &SyncConfig) -> Result<Self, SyncError> {
        let store = SnapshotStore::in_dir(&config.snapshot_dir()?, root)?;
        Ok(Self::with_store(store, config.ignore_patterns.iter().cloned()))
    }

    /// Canonical root being synchronized
    pub fn root(&self) -> &Path {
        self.store.root()
    }

    pub fn snapshot_path(&self) -> &Path {
        self.store.path()
    }

    pub fn ignore_patterns(&self) -> &[String] {
        self.matcher.patterns()
    }

    pub fn is_initialized(&self) -> bool {
        self.state.is_some()
    }

    /// Number of tracked files (zero before initialization)
    pub fn file_count(&self) -> usize {
        self.state.as_ref().map_or(0, |state| state.files.len())
    }

    /// Load the persisted snapshot, or build and persist the first one.
    #[instrument(skip(self), fields(root = %self.store.root().display()))]
    pub fn initialize(&mut self) -> Result<(), SyncError> {
        let state = match self.store.load() {
            Ok((files, dag)) => {
                info!(file_count = files.len(), "Loaded existing snapshot");
                SyncState { files, dag }
            }
            Err(SyncError::SnapshotNotFound(_)) => {
                info!("No snapshot found, building initial state");
                let state = self.scan()?;
                self.store.save(&state.files, &state.dag)?;
                info!(
                    file_count = state.files.len(),
                    snapshot = %self.store.path().display(),
                    "Created initial snapshot"
                );
                state
            }
            Err(e) => return Err(e),
        };

        self.state = Some(state);
        Ok(())
    }

    /// Rescan the root and report what changed since the held state.
    ///
    /// When nothing changed, returns an empty diff without touching the snapshot.
    #[instrument(skip(self), fields(root = %self.store.root().display()))]
    pub fn check_for_changes(&mut self) -> Result<FileChanges, SyncError> {
        let held = self.state.as_ref().ok_or(SyncError::NotInitialized)?;
        let fresh = self.scan()?;

        let dag_diff = MerkleDag::compare(&held.dag, &fresh.dag);
        if dag_diff.is_empty() {
            debug!("Fingerprint unchanged");
            return Ok(FileChanges::default());
        }

        debug!(
            nodes_added = dag_diff.added.len(),
            nodes_removed = dag_diff.removed.len(),
            nodes_modified = dag_diff.modified.len(),
            "Fingerprint changed, computing file diff"
        );

        let changes = FileChanges::between(&held.files, &fresh.files);
        self.store.save(&fresh.files, &fresh.dag)?;
        self.state = Some(fresh);

        info!(
            added = changes.added.len(),
            removed = changes.removed.len(),
            modified = changes.modified.len(),
            "Detected changes"
        );
        Ok(changes)
    }

    /// Hash of a tracked file, if it was present in the held state
    pub fn get_file_hash(&self, relative_path: &str) -> Option<&ContentHash> {
        self.state
            .as_ref()?
            .files
            .get(&normalize_relative_path(relative_path))
    }

    /// Replace the ignore patterns used by subsequent scans.
    ///
    /// The held state is not reinterpreted; the next check reports paths that became ignored
    /// as removed and paths that stopped being ignored as added.
    pub fn update_ignore_patterns<I, S>(&mut self, ignore_patterns: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.matcher = IgnoreMatcher::new(ignore_patterns);
        debug!(patterns = ?self.matcher.patterns(), "Updated ignore patterns");
    }

    /// Remove the default-location snapshot for `root`. A missing snapshot is not an error.
    pub fn delete_snapshot(root: &Path) -> Result<(), SyncError> {
        SnapshotStore::delete_for_root(root)
    }

    fn scan(&self) -> Result<SyncState, SyncError> {
        let files = TreeHasher::new(self.store.root(), &self.matcher).scan()?;
        let dag = MerkleDag::build(&files);
        Ok(SyncState { files, dag })
    }
}
