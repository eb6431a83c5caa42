//! CLI parse: clap types for treesync. No behavior; definitions only.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// treesync - incremental change detection for a directory tree
#[derive(Parser, Debug)]
#[command(name = "treesync")]
#[command(about = "Detect added, removed and modified files since the last scan")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Root directory to synchronize
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Disable logging entirely
    #[arg(long, default_value = "false")]
    pub quiet: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Load the snapshot for the root, or build and save the first one
    Init,
    /// Report files added, removed or modified since the last snapshot
    Check {
        /// Print the changes as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the stored hash of a file relative to the root
    Hash {
        /// Path relative to the root
        path: String,
    },
    /// Delete the snapshot for the root
    Forget,
    /// Print where the snapshot for the root is stored
    Where,
}
