//! XDG base directory resolution
//!
//! `XDG_*` variables win, then `$HOME/.config` / `$HOME/.local/share`, then the platform
//! directories reported by `directories`.

use crate::error::SyncError;
use directories::BaseDirs;
use std::path::PathBuf;

/// Application directory name under the XDG roots
pub const APP_DIR: &str = "treesync";

fn from_env(var: &str) -> Option<PathBuf> {
    std::env::var_os(var)
        .map(PathBuf::from)
        .filter(|p| p.is_absolute())
}

/// `$XDG_CONFIG_HOME`, falling back to `~/.config`
pub fn config_home() -> Result<PathBuf, SyncError> {
    if let Some(dir) = from_env("XDG_CONFIG_HOME") {
        return Ok(dir);
    }
    if let Some(home) = from_env("HOME") {
        return Ok(home.join(".config"));
    }
    BaseDirs::new()
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or_else(|| SyncError::Config("Could not determine config directory".to_string()))
}

/// `$XDG_DATA_HOME`, falling back to `~/.local/share`
pub fn data_home() -> Result<PathBuf, SyncError> {
    if let Some(dir) = from_env("XDG_DATA_HOME") {
        return Ok(dir);
    }
    if let Some(home) = from_env("HOME") {
        return Ok(home.join(".local").join("share"));
    }
    BaseDirs::new()
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| SyncError::Config("Could not determine data directory".to_string()))
}

/// Default location of snapshot files: `$XDG_DATA_HOME/treesync/snapshots`
pub fn snapshots_dir() -> Result<PathBuf, SyncError> {
    Ok(data_home()?.join(APP_DIR).join("snapshots"))
}

/// Global config file: `$XDG_CONFIG_HOME/treesync/config.toml`
pub fn global_config_path() -> Result<PathBuf, SyncError> {
    Ok(config_home()?.join(APP_DIR).join("config.toml"))
}
