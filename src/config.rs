//! Configuration System
//!
//! Layered configuration for the synchronizer and its command-line harness. Sources, lowest
//! precedence first: built-in defaults, the global file
//! (`$XDG_CONFIG_HOME/treesync/config.toml`), the workspace file (`<root>/.treesync.toml`) and
//! `TREESYNC_*` environment variables.

use crate::error::SyncError;
use crate::logging::LoggingConfig;
use config::{Config, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

mod merge;
mod sources;
pub mod xdg;

pub use sources::workspace_file::WORKSPACE_CONFIG_FILE;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Gitignore-style patterns applied to every scan
    #[serde(default)]
    pub ignore_patterns: Vec<String>,

    /// Append the patterns of `<root>/.gitignore` (read by the CLI)
    #[serde(default)]
    pub use_gitignore: bool,

    /// Directory holding snapshot files (defaults to `$XDG_DATA_HOME/treesync/snapshots`)
    #[serde(default)]
    pub snapshot_dir: Option<PathBuf>,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl SyncConfig {
    /// Validate the configuration, collecting every problem.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if let Some(dir) = &self.snapshot_dir {
            if dir.as_os_str().is_empty() {
                errors.push("snapshot_dir cannot be empty".to_string());
            }
        }

        if self.logging.format != "json" && self.logging.format != "text" {
            errors.push(format!(
                "logging.format must be 'json' or 'text', got '{}'",
                self.logging.format
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Resolved snapshot directory
    pub fn snapshot_dir(&self) -> Result<PathBuf, SyncError> {
        match &self.snapshot_dir {
            Some(dir) => Ok(dir.clone()),
            None => xdg::snapshots_dir(),
        }
    }
}

/// Loads [`SyncConfig`] from its layered sources.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration for a workspace root.
    pub fn load(workspace_root: &Path) -> Result<SyncConfig, SyncError> {
        let mut builder = merge::merge_policy::builder_with_defaults()?;
        builder = sources::global_file::add_to_builder(builder)?;
        builder = sources::workspace_file::add_to_builder(builder, workspace_root)?;
        builder = builder.add_source(merge::merge_policy::environment());

        let config: SyncConfig = builder.build()?.try_deserialize()?;
        Self::validated(config)
    }

    /// Load configuration from a single explicit file (no other layers).
    pub fn load_from_file(path: &Path) -> Result<SyncConfig, SyncError> {
        let config: SyncConfig = Config::builder()
            .add_source(File::from(path.to_path_buf()))
            .build()?
            .try_deserialize()?;
        Self::validated(config)
    }

    fn validated(config: SyncConfig) -> Result<SyncConfig, SyncError> {
        config.validate().map_err(|errors| {
            SyncError::Config(format!(
                "Configuration validation failed:\n{}",
                errors.join("\n")
            ))
        })?;
        Ok(config)
    }
}
