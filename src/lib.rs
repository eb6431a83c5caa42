//! treesync: incremental change detection for a directory tree
//!
//! Scans a root directory, hashes every tracked file with BLAKE3, fingerprints the result with
//! a Merkle structure, and persists a snapshot per root. Later checks rescan and report files
//! added, removed or modified since the previous snapshot.

pub mod cli;
pub mod config;
pub mod error;
pub mod ignore;
pub mod logging;
pub mod merkle;
pub mod store;
pub mod sync;
pub mod tree;
pub mod types;

pub use error::SyncError;
pub use ignore::IgnoreMatcher;
pub use merkle::MerkleDag;
pub use store::SnapshotStore;
pub use sync::Synchronizer;
pub use types::FileChanges;
