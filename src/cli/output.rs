//! CLI output: error mapping from domain errors to the CLI surface.

use crate::error::SyncError;

/// Map domain errors to a message for CLI output, with a hint where one helps.
pub fn map_error(e: &SyncError) -> String {
    match e {
        SyncError::SnapshotCorrupt { path, .. } => format!(
            "{}\nRun `treesync forget` to discard it, or remove {} manually.",
            e,
            path.display()
        ),
        _ => e.to_string(),
    }
}
