//! Content hashing using BLAKE3

use crate::error::SyncError;
use crate::types::ContentHash;
use blake3::Hasher;
use std::path::Path;
use tracing::trace;

/// Compute the hex content hash of raw bytes
pub fn compute_content_hash(content: &[u8]) -> ContentHash {
    let mut hasher = Hasher::new();
    hasher.update(content);
    hex::encode(hasher.finalize().as_bytes())
}

/// Hash the bytes of a regular file.
///
/// A directory at `path` is an invariant violation (the entry changed type between listing and
/// hashing) and yields [`SyncError::HashDirectory`]. Read failures surface as [`SyncError::Io`].
pub fn hash_file(path: &Path) -> Result<ContentHash, SyncError> {
    let metadata = std::fs::metadata(path)?;
    if metadata.is_dir() {
        return Err(SyncError::HashDirectory(path.to_path_buf()));
    }

    let content = std::fs::read(path)?;
    let hash = compute_content_hash(&content);
    trace!(path = %path.display(), bytes = content.len(), hash = %hash, "Hashed file");
    Ok(hash)
}
