//! Fingerprint DAG over a file state
//!
//! A two-level content-addressed structure: one root node whose content is the concatenation of
//! every file hash in path order, and one leaf per file with content `path:hash`. Node ids are the
//! BLAKE3 digest of the node content, so two DAGs built from equal file states have identical node
//! sets, and any added, removed or modified file changes at least one node.
//!
//! Nodes live in a flat map with one designated root rather than a recursive structure.

use crate::error::SyncError;
use crate::tree::hasher;
use crate::types::{FileState, NodeId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// A node in the fingerprint DAG
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DagNode {
    pub id: NodeId,
    pub content: String,
    pub parents: Vec<NodeId>,
    pub children: Vec<NodeId>,
}

/// Node-level differences between two DAGs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DagDiff {
    /// Node ids only present in the newer DAG
    pub added: Vec<NodeId>,
    /// Node ids only present in the older DAG
    pub removed: Vec<NodeId>,
    /// Node ids present in both with different content
    pub modified: Vec<NodeId>,
}

impl DagDiff {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.modified.is_empty()
    }
}

/// Plain serialized form of a [`MerkleDag`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializedDag {
    pub nodes: Vec<DagNode>,
    pub root_ids: Vec<NodeId>,
}

/// Content-addressed fingerprint of one scan
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MerkleDag {
    nodes: BTreeMap<NodeId, DagNode>,
    root_ids: Vec<NodeId>,
}

impl MerkleDag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the fingerprint of a file state: one root plus one leaf per file.
    pub fn build(files: &FileState) -> Self {
        let mut dag = MerkleDag::new();

        let root_content: String = files.values().map(String::as_str).collect();
        let root_id = dag.add_node(&root_content, None);

        for (path, hash) in files {
            dag.add_node(&format!("{}:{}", path, hash), Some(&root_id));
        }

        dag
    }

    /// Add a node, optionally attached under `parent`, and return its id.
    ///
    /// Nodes without a parent become roots; a DAG may hold several. Adding content that already
    /// exists returns the existing id. Attaching a node under an existing parent removes it from
    /// the roots; an unknown parent or the node itself is not linked, and the node stays a root.
    pub fn add_node(&mut self, content: &str, parent: Option<&NodeId>) -> NodeId {
        let id = hasher::compute_content_hash(content.as_bytes());

        if !self.nodes.contains_key(&id) {
            self.nodes.insert(
                id.clone(),
                DagNode {
                    id: id.clone(),
                    content: content.to_string(),
                    parents: Vec::new(),
                    children: Vec::new(),
                },
            );
        }

        let linkable =
            parent.filter(|parent_id| **parent_id != id && self.nodes.contains_key(*parent_id));
        let Some(parent_id) = linkable else {
            // Unlinked nodes stay reachable as roots
            let orphan = self.nodes.get(&id).is_some_and(|node| node.parents.is_empty());
            if orphan && !self.root_ids.contains(&id) {
                self.root_ids.push(id.clone());
            }
            return id;
        };

        if let Some(parent_node) = self.nodes.get_mut(parent_id) {
            if !parent_node.children.contains(&id) {
                parent_node.children.push(id.clone());
            }
        }
        if let Some(node) = self.nodes.get_mut(&id) {
            if !node.parents.contains(parent_id) {
                node.parents.push(parent_id.clone());
            }
        }
        self.root_ids.retain(|root_id| *root_id != id);

        id
    }

    pub fn get_node(&self, id: &str) -> Option<&DagNode> {
        self.nodes.get(id)
    }

    /// The designated root, if any node has been added
    pub fn root(&self) -> Option<&DagNode> {
        self.root_ids.first().and_then(|id| self.nodes.get(id))
    }

    pub fn root_ids(&self) -> &[NodeId] {
        &self.root_ids
    }

    /// Leaf nodes (nodes without children), in id order
    pub fn leaves(&self) -> impl Iterator<Item = &DagNode> {
        self.nodes.values().filter(|node| node.children.is_empty())
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Compare two DAGs by node id and content.
    pub fn compare(old: &MerkleDag, new: &MerkleDag) -> DagDiff {
        let old_ids: BTreeSet<&NodeId> = old.nodes.keys().collect();
        let new_ids: BTreeSet<&NodeId> = new.nodes.keys().collect();

        DagDiff {
            added: new_ids.difference(&old_ids).map(|id| (*id).clone()).collect(),
            removed: old_ids.difference(&new_ids).map(|id| (*id).clone()).collect(),
            modified: old_ids
                .intersection(&new_ids)
                .filter(|id| old.nodes[**id].content != new.nodes[**id].content)
                .map(|id| (*id).clone())
                .collect(),
        }
    }

    pub fn serialize(&self) -> SerializedDag {
        SerializedDag {
            nodes: self.nodes.values().cloned().collect(),
            root_ids: self.root_ids.clone(),
        }
    }

    /// Rebuild a DAG from its serialized form, rejecting dangling links.
    pub fn deserialize(data: SerializedDag) -> Result<Self, SyncError> {
        let mut nodes = BTreeMap::new();
        for node in data.nodes {
            if nodes.contains_key(&node.id) {
                return Err(invalid(format!("duplicate node id {}", node.id)));
            }
            nodes.insert(node.id.clone(), node);
        }

        let mut seen_roots = BTreeSet::new();
        for root_id in &data.root_ids {
            let Some(root) = nodes.get(root_id) else {
                return Err(invalid(format!("unknown root {}", root_id)));
            };
            if !root.parents.is_empty() {
                return Err(invalid(format!("root {} has parents", root_id)));
            }
            if !seen_roots.insert(root_id) {
                return Err(invalid(format!("duplicate root {}", root_id)));
            }
        }

        for node in nodes.values() {
            for linked in node.parents.iter().chain(node.children.iter()) {
                if !nodes.contains_key(linked) {
                    return Err(invalid(format!(
                        "node {} links to unknown node {}",
                        node.id, linked
                    )));
                }
            }
        }

        Ok(Self {
            nodes,
            root_ids: data.root_ids,
        })
    }
}

fn invalid(reason: String) -> SyncError {
    SyncError::InvalidDag(reason)
}
