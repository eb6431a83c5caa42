//! End-to-end synchronizer behavior against the default snapshot location

use super::test_utils::{create_workspace, with_xdg_env, write_file};
use std::fs;
use tempfile::TempDir;
use treesync::tree::hasher::compute_content_hash;
use treesync::{SnapshotStore, SyncError, Synchronizer};

#[test]
fn test_snapshot_lands_in_xdg_data_home() {
    let test_dir = TempDir::new().unwrap();
    let root = create_workspace(&test_dir, &[("a.txt", "alpha")]);

    with_xdg_env(&test_dir, || {
        let mut sync = Synchronizer::new(&root, Vec::<String>::new()).unwrap();
        sync.initialize().unwrap();

        let expected_dir = test_dir.path().join("data").join("treesync").join("snapshots");
        assert_eq!(sync.snapshot_path().parent().unwrap(), expected_dir.as_path());
        assert!(sync.snapshot_path().exists());
        assert_eq!(
            SnapshotStore::path_for(&root).unwrap().as_path(),
            sync.snapshot_path()
        );
    });
}

#[test]
fn test_full_change_cycle() {
    let test_dir = TempDir::new().unwrap();
    let root = create_workspace(
        &test_dir,
        &[
            ("src/lib.rs", "pub fn a() {}"),
            ("src/util.rs", "pub fn b() {}"),
            ("target/debug/app", "binary"),
        ],
    );

    with_xdg_env(&test_dir, || {
        let mut sync = Synchronizer::new(&root, ["target/"]).unwrap();
        sync.initialize().unwrap();
        assert_eq!(sync.file_count(), 2);

        write_file(&root, "src/lib.rs", "pub fn a() { changed() }");
        fs::remove_file(root.join("src/util.rs")).unwrap();
        write_file(&root, "src/new.rs", "pub fn c() {}");
        write_file(&root, "target/debug/other", "ignored");

        let changes = sync.check_for_changes().unwrap();
        assert_eq!(changes.added, vec!["src/new.rs"]);
        assert_eq!(changes.removed, vec!["src/util.rs"]);
        assert_eq!(changes.modified, vec!["src/lib.rs"]);
        assert_eq!(
            sync.get_file_hash("src/lib.rs"),
            Some(&compute_content_hash(b"pub fn a() { changed() }"))
        );

        assert!(sync.check_for_changes().unwrap().is_empty());
    });
}

#[test]
fn test_restart_reports_changes_made_while_stopped() {
    let test_dir = TempDir::new().unwrap();
    let root = create_workspace(&test_dir, &[("a.txt", "alpha"), ("b.txt", "beta")]);

    with_xdg_env(&test_dir, || {
        let mut first = Synchronizer::new(&root, Vec::<String>::new()).unwrap();
        first.initialize().unwrap();
        drop(first);

        write_file(&root, "b.txt", "beta v2");

        let mut second = Synchronizer::new(&root, Vec::<String>::new()).unwrap();
        second.initialize().unwrap();
        let changes = second.check_for_changes().unwrap();
        assert_eq!(changes.modified, vec!["b.txt"]);
        assert!(changes.added.is_empty());
        assert!(changes.removed.is_empty());
    });
}

#[test]
fn test_delete_snapshot() {
    let test_dir = TempDir::new().unwrap();
    let root = create_workspace(&test_dir, &[("a.txt", "alpha")]);

    with_xdg_env(&test_dir, || {
        // No snapshot yet
        Synchronizer::delete_snapshot(&root).unwrap();

        let mut sync = Synchronizer::new(&root, Vec::<String>::new()).unwrap();
        sync.initialize().unwrap();
        assert!(sync.snapshot_path().exists());

        Synchronizer::delete_snapshot(&root).unwrap();
        assert!(!sync.snapshot_path().exists());
    });
}

#[test]
fn test_corrupt_snapshot_is_not_silently_replaced() {
    let test_dir = TempDir::new().unwrap();
    let root = create_workspace(&test_dir, &[("a.txt", "alpha")]);

    with_xdg_env(&test_dir, || {
        let path = SnapshotStore::path_for(&root).unwrap();
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "{\"version\": 1}").unwrap();

        let mut sync = Synchronizer::new(&root, Vec::<String>::new()).unwrap();
        let err = sync.initialize().unwrap_err();
        assert!(matches!(err, SyncError::SnapshotCorrupt { .. }));
        assert_eq!(fs::read_to_string(&path).unwrap(), "{\"version\": 1}");
    });
}

#[test]
fn test_missing_root_fails_to_construct() {
    let test_dir = TempDir::new().unwrap();
    with_xdg_env(&test_dir, || {
        let missing = test_dir.path().join("missing");
        assert!(matches!(
            Synchronizer::new(&missing, Vec::<String>::new()),
            Err(SyncError::InvalidPath(_))
        ));
    });
}
