//! Error types for the change-detection system.

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by scanning, fingerprinting, snapshot storage and configuration
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// A path listed as a file turned out to be a directory when it was hashed
    #[error("Attempted to hash a directory: {0}")]
    HashDirectory(PathBuf),

    #[error("No snapshot found at {0}")]
    SnapshotNotFound(PathBuf),

    #[error("Snapshot at {path} is corrupt: {reason}")]
    SnapshotCorrupt { path: PathBuf, reason: String },

    #[error("Invalid fingerprint DAG: {0}")]
    InvalidDag(String),

    #[error("Synchronizer is not initialized; call initialize() first")]
    NotInitialized,

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<config::ConfigError> for SyncError {
    fn from(err: config::ConfigError) -> Self {
        SyncError::Config(err.to_string())
    }
}
