//! CLI route: run context and command dispatch.

use crate::cli::parse::Commands;
use crate::cli::presentation::{format_changes_json, format_changes_text};
use crate::config::{ConfigLoader, SyncConfig};
use crate::error::SyncError;
use crate::store::SnapshotStore;
use crate::sync::Synchronizer;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Read `<root>/.gitignore` into pattern strings (trimmed, blank lines and comments dropped).
pub fn read_gitignore_patterns(root: &Path) -> Vec<String> {
    let Ok(contents) = fs::read_to_string(root.join(".gitignore")) else {
        return Vec::new();
    };
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

/// Runtime context for CLI execution: root, loaded configuration, and output settings.
pub struct RunContext {
    root: PathBuf,
    config: SyncConfig,
    color: bool,
}

impl RunContext {
    /// Create a run context from the root and an optional explicit config file.
    pub fn new(root: PathBuf, config_path: Option<PathBuf>) -> Result<Self, SyncError> {
        let config = match config_path {
            Some(path) => ConfigLoader::load_from_file(&path)?,
            None => ConfigLoader::load(&root)?,
        };
        let color = config.logging.color;
        Ok(Self {
            root,
            config,
            color,
        })
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Ignore patterns from configuration, plus `.gitignore` when enabled
    pub fn ignore_patterns(&self) -> Vec<String> {
        let mut patterns = self.config.ignore_patterns.clone();
        if self.config.use_gitignore {
            let from_gitignore = read_gitignore_patterns(&self.root);
            debug!(count = from_gitignore.len(), "Loaded .gitignore patterns");
            patterns.extend(from_gitignore);
        }
        patterns
    }

    fn synchronizer(&self) -> Result<Synchronizer, SyncError> {
        let store = SnapshotStore::in_dir(&self.config.snapshot_dir()?, &self.root)?;
        Ok(Synchronizer::with_store(store, self.ignore_patterns()))
    }

    /// Execute a command and return its output text.
    pub fn execute(&self, command: &Commands) -> Result<String, SyncError> {
        match command {
            Commands::Init => {
                let mut sync = self.synchronizer()?;
                sync.initialize()?;
                Ok(format!(
                    "Tracking {} files under {}\nSnapshot: {}",
                    sync.file_count(),
                    sync.root().display(),
                    sync.snapshot_path().display()
                ))
            }
            Commands::Check { json } => {
                let mut sync = self.synchronizer()?;
                sync.initialize()?;
                let changes = sync.check_for_changes()?;
                if *json {
                    format_changes_json(&changes)
                } else {
                    Ok(format_changes_text(&changes, self.color))
                }
            }
            Commands::Hash { path } => {
                let mut sync = self.synchronizer()?;
                sync.initialize()?;
                sync.get_file_hash(path)
                    .cloned()
                    .ok_or_else(|| SyncError::InvalidPath(format!("{} is not tracked", path)))
            }
            Commands::Forget => {
                SnapshotStore::delete_in(&self.config.snapshot_dir()?, &self.root)?;
                Ok(format!("Forgot snapshot for {}", self.root.display()))
            }
            Commands::Where => {
                let store = SnapshotStore::in_dir(&self.config.snapshot_dir()?, &self.root)?;
                Ok(store.path().display().to_string())
            }
        }
    }
}
