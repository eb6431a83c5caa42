//! Filesystem scanning
//!
//! Walks a synchronized root, skipping ignored entries, and hashes every regular file into a
//! [`FileState`](crate::types::FileState).

pub mod hasher;
pub mod path;
pub mod walker;

pub use walker::TreeHasher;
