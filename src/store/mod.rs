//! Snapshot Store
//!
//! Durable (file state, fingerprint) pairs, one per synchronized root.

pub mod snapshot;

pub use snapshot::SnapshotStore;
