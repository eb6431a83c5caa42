//! Snapshot document format and round-trip behavior

use super::test_utils::create_workspace;
use std::fs;
use tempfile::TempDir;
use treesync::tree::TreeHasher;
use treesync::{IgnoreMatcher, MerkleDag, SnapshotStore, SyncError};

#[test]
fn test_roundtrip_of_scanned_tree() {
    let test_dir = TempDir::new().unwrap();
    let root = create_workspace(
        &test_dir,
        &[("a.txt", "a"), ("dir/b.txt", "b"), ("dir/sub/c.txt", "c")],
    );

    let files = TreeHasher::new(&root, &IgnoreMatcher::default())
        .scan()
        .unwrap();
    let dag = MerkleDag::build(&files);

    let store = SnapshotStore::in_dir(&test_dir.path().join("snapshots"), &root).unwrap();
    store.save(&files, &dag).unwrap();

    let (loaded_files, loaded_dag) = store.load().unwrap();
    assert_eq!(loaded_files, files);
    assert!(MerkleDag::compare(&dag, &loaded_dag).is_empty());
    assert_eq!(loaded_dag.node_count(), dag.node_count());
}

#[test]
fn test_document_shape() {
    let test_dir = TempDir::new().unwrap();
    let root = create_workspace(&test_dir, &[("b.txt", "b"), ("a.txt", "a")]);

    let files = TreeHasher::new(&root, &IgnoreMatcher::default())
        .scan()
        .unwrap();
    let store = SnapshotStore::in_dir(&test_dir.path().join("snapshots"), &root).unwrap();
    store.save(&files, &MerkleDag::build(&files)).unwrap();

    let document: serde_json::Value =
        serde_json::from_slice(&fs::read(store.path()).unwrap()).unwrap();
    assert_eq!(document["version"], 1);
    assert!(document["saved_at"].is_string());

    let pairs = document["file_hashes"].as_array().unwrap();
    assert_eq!(pairs.len(), 2);
    assert_eq!(pairs[0][0], "a.txt");
    assert_eq!(pairs[1][0], "b.txt");

    let dag = &document["merkle_dag"];
    assert_eq!(dag["root_ids"].as_array().unwrap().len(), 1);
    assert_eq!(dag["nodes"].as_array().unwrap().len(), 3);
}

#[test]
fn test_tampered_dag_is_corrupt() {
    let test_dir = TempDir::new().unwrap();
    let root = create_workspace(&test_dir, &[("a.txt", "a")]);

    let files = TreeHasher::new(&root, &IgnoreMatcher::default())
        .scan()
        .unwrap();
    let store = SnapshotStore::in_dir(&test_dir.path().join("snapshots"), &root).unwrap();
    store.save(&files, &MerkleDag::build(&files)).unwrap();

    let mut document: serde_json::Value =
        serde_json::from_slice(&fs::read(store.path()).unwrap()).unwrap();
    document["merkle_dag"]["root_ids"] = serde_json::json!(["not-a-node"]);
    fs::write(store.path(), serde_json::to_vec(&document).unwrap()).unwrap();

    assert!(matches!(
        store.load(),
        Err(SyncError::SnapshotCorrupt { .. })
    ));
}

#[test]
fn test_delete_for_removed_root() {
    let test_dir = TempDir::new().unwrap();
    let root = create_workspace(&test_dir, &[("a.txt", "a")]);
    let snapshots = test_dir.path().join("snapshots");

    let files = TreeHasher::new(&root, &IgnoreMatcher::default())
        .scan()
        .unwrap();
    let store = SnapshotStore::in_dir(&snapshots, &root).unwrap();
    store.save(&files, &MerkleDag::build(&files)).unwrap();

    fs::remove_dir_all(&root).unwrap();
    SnapshotStore::delete_in(&snapshots, store.root()).unwrap();
    assert!(!store.exists());
}
