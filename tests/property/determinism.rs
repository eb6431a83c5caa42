//! Property-based tests for ignore rules, diffs and fingerprints

use proptest::prelude::*;
use std::collections::BTreeMap;
use treesync::tree::hasher;
use treesync::types::{FileChanges, FileState};
use treesync::{IgnoreMatcher, MerkleDag};

fn segment() -> impl Strategy<Value = String> {
    "[a-z0-9_]{1,8}"
}

fn relative_path() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(segment(), 1..5)
}

fn file_state() -> impl Strategy<Value = FileState> {
    prop::collection::btree_map("[a-d]{1,3}(/[a-d]{1,3}){0,2}", "[0-9a-f]{8}", 0..12)
}

fn pattern() -> impl Strategy<Value = String> {
    prop_oneof![
        segment(),
        segment().prop_map(|s| format!("/{}", s)),
        segment().prop_map(|s| format!("{}/", s)),
        segment().prop_map(|s| format!("**/{}", s)),
        segment().prop_map(|s| format!("!{}", s)),
        Just("*".to_string()),
    ]
}

proptest! {
    #[test]
    fn prop_hidden_segment_always_ignored(
        mut segments in relative_path(),
        hidden in segment(),
        position in any::<prop::sample::Index>(),
        patterns in prop::collection::vec(pattern(), 0..6),
        is_directory in any::<bool>(),
    ) {
        let index = position.index(segments.len() + 1);
        segments.insert(index, format!(".{}", hidden));
        let path = segments.join("/");

        let matcher = IgnoreMatcher::new(patterns);
        prop_assert!(matcher.is_ignored(&path, is_directory));
    }

    #[test]
    fn prop_root_is_never_ignored(patterns in prop::collection::vec(pattern(), 0..6)) {
        let matcher = IgnoreMatcher::new(patterns);
        prop_assert!(!matcher.is_ignored("", true));
    }

    #[test]
    fn prop_negated_patterns_never_ignore(path in relative_path(), name in segment()) {
        let path = path.join("/");
        let matcher = IgnoreMatcher::new([format!("!{}", name), "!*".to_string()]);
        prop_assert!(!matcher.is_ignored(&path, false));
        prop_assert!(!matcher.is_ignored(&path, true));
    }

    #[test]
    fn prop_diff_matches_set_difference(old in file_state(), new in file_state()) {
        let changes = FileChanges::between(&old, &new);

        for path in &changes.added {
            prop_assert!(new.contains_key(path) && !old.contains_key(path));
        }
        for path in &changes.removed {
            prop_assert!(old.contains_key(path) && !new.contains_key(path));
        }
        for path in &changes.modified {
            prop_assert_ne!(old.get(path), new.get(path));
            prop_assert!(old.contains_key(path) && new.contains_key(path));
        }

        // Applying the diff to the old paths yields exactly the new paths
        let mut paths: BTreeMap<&String, ()> = old.keys().map(|k| (k, ())).collect();
        for path in &changes.removed {
            paths.remove(path);
        }
        for path in &changes.added {
            paths.insert(path, ());
        }
        prop_assert!(paths.keys().copied().eq(new.keys()));

        let differing = old
            .iter()
            .filter(|(path, hash)| new.get(*path).is_some_and(|h| h != *hash))
            .count();
        prop_assert_eq!(changes.modified.len(), differing);
    }

    #[test]
    fn prop_fingerprint_equal_iff_state_equal(old in file_state(), new in file_state()) {
        let diff = MerkleDag::compare(&MerkleDag::build(&old), &MerkleDag::build(&new));
        prop_assert_eq!(diff.is_empty(), old == new);
    }

    #[test]
    fn prop_fingerprint_serialization_roundtrip(files in file_state()) {
        let dag = MerkleDag::build(&files);
        let restored = MerkleDag::deserialize(dag.serialize()).unwrap();
        prop_assert!(MerkleDag::compare(&dag, &restored).is_empty());
        prop_assert_eq!(restored.node_count(), dag.node_count());
    }

    #[test]
    fn prop_content_hash_deterministic(content in any::<Vec<u8>>()) {
        prop_assert_eq!(
            hasher::compute_content_hash(&content),
            hasher::compute_content_hash(&content.clone())
        );
    }
}
