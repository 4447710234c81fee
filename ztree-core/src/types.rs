//! Domain types for the ztree reconciler.
//!
//! All tree paths use the [`NodePath`] newtype; never bare `String`s.
//! All types are serializable/deserializable via serde.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::path;

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// A strongly-typed object store bucket name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BucketName(pub String);

impl BucketName {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for BucketName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for BucketName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for BucketName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// A strongly-typed object key (flat identifier within a bucket).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectKey(pub String);

impl ObjectKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for ObjectKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ObjectKey {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// A hierarchical tree-store path with exactly one leading separator.
///
/// Construct via [`path::node_path`] or [`NodePath::from`]; `From` normalizes
/// the leading separator so a `NodePath` is always absolute.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodePath(String);

impl NodePath {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Every proper ancestor of this path, root-to-leaf: `/a`, `/a/b` for
    /// `/a/b/c`. The path itself is never included.
    pub fn proper_ancestors(&self) -> Vec<NodePath> {
        path::proper_ancestors(self)
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for NodePath {
    fn from(s: String) -> Self {
        if s.starts_with(path::SEPARATOR) {
            Self(s)
        } else {
            Self(format!("{}{s}", path::SEPARATOR))
        }
    }
}

impl From<&str> for NodePath {
    fn from(s: &str) -> Self {
        Self::from(s.to_owned())
    }
}

/// Version token of a tree node, used for optimistic-concurrency updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeVersion(pub i32);

impl fmt::Display for NodeVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

// ---------------------------------------------------------------------------
// Listing and plan
// ---------------------------------------------------------------------------

/// One row of an object store listing, as reported by the store.
///
/// `raw_fingerprint` may carry provider quoting (S3 ETags arrive as
/// `"\"<md5>\""`); it is normalized when a record is built from the entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingEntry {
    pub key: ObjectKey,
    pub raw_fingerprint: String,
}

/// Derived classification of a record after diffing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncAction {
    /// Tree content matches the source fingerprint; nothing to write.
    InSync,
    /// No node at the target path; create it.
    Create,
    /// Node exists with different content; versioned update.
    Update,
    /// Not yet compared against the tree store.
    Unknown,
}

/// One source object and its reconciliation state for the current run.
///
/// `checked`, `needs_write` and `synced` move monotonically within a run:
/// the diff sets `checked`/`needs_write`, the orchestrator sets `synced`
/// once a write is confirmed. Nothing resets them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectRecord {
    pub key: ObjectKey,
    pub target_path: NodePath,
    /// Normalized content fingerprint as reported by the source store.
    pub source_fingerprint: String,
    /// A comparison against the tree store has been attempted.
    pub checked: bool,
    /// Tree content differs or the node is absent.
    pub needs_write: bool,
    /// Write confirmed, or the node was already in sync.
    pub synced: bool,
    /// Version observed at diff time, when the node existed.
    pub node_version: Option<NodeVersion>,
}

impl ObjectRecord {
    /// Build an unchecked record from a listing entry under `prefix`.
    ///
    /// Maps the key to its target path and normalizes the fingerprint.
    pub fn from_listing(prefix: &str, entry: &ListingEntry) -> Self {
        Self {
            target_path: path::node_path(prefix, entry.key.as_str()),
            source_fingerprint: crate::fingerprint::normalize(&entry.raw_fingerprint),
            key: entry.key.clone(),
            checked: false,
            needs_write: false,
            synced: false,
            node_version: None,
        }
    }

    /// Tri-state classification derived from the diff flags.
    pub fn action(&self) -> SyncAction {
        if !self.checked {
            SyncAction::Unknown
        } else if !self.needs_write {
            SyncAction::InSync
        } else if self.node_version.is_some() {
            SyncAction::Update
        } else {
            SyncAction::Create
        }
    }
}

/// The per-run reconciliation plan: every listed object and its state.
///
/// Rebuilt from a fresh listing snapshot on every run; never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncPlan {
    pub bucket: BucketName,
    pub prefix: String,
    pub records: Vec<ObjectRecord>,
}

impl SyncPlan {
    /// True if any record still has `synced == false`.
    pub fn needs_sync(&self) -> bool {
        self.records.iter().any(|record| !record.synced)
    }

    /// Records the orchestrator would write (post-diff).
    pub fn pending(&self) -> impl Iterator<Item = &ObjectRecord> {
        self.records.iter().filter(|record| record.needs_write)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn record(path: &str, synced: bool) -> ObjectRecord {
        ObjectRecord {
            key: ObjectKey::from("k"),
            target_path: NodePath::from(path),
            source_fingerprint: String::new(),
            checked: true,
            needs_write: !synced,
            synced,
            node_version: None,
        }
    }

    #[test]
    fn newtype_display() {
        assert_eq!(BucketName::from("solr-config").to_string(), "solr-config");
        assert_eq!(ObjectKey::from("TAG2/a.txt").to_string(), "TAG2/a.txt");
        assert_eq!(NodePath::from("/a.txt").to_string(), "/a.txt");
    }

    #[test]
    fn node_path_from_relative_gets_leading_separator() {
        assert_eq!(NodePath::from("sub/b.txt").as_str(), "/sub/b.txt");
    }

    #[test]
    fn record_from_listing_maps_and_normalizes() {
        let entry = ListingEntry {
            key: ObjectKey::from("TAG2/sub/b.txt"),
            raw_fingerprint: "\"deadbeef\"".to_string(),
        };
        let rec = ObjectRecord::from_listing("TAG2/", &entry);
        assert_eq!(rec.target_path.as_str(), "/sub/b.txt");
        assert_eq!(rec.source_fingerprint, "deadbeef");
        assert!(!rec.checked && !rec.needs_write && !rec.synced);
        assert_eq!(rec.action(), SyncAction::Unknown);
    }

    #[test]
    fn action_derivation() {
        let mut rec = record("/x", true);
        assert_eq!(rec.action(), SyncAction::InSync);

        rec.needs_write = true;
        rec.synced = false;
        assert_eq!(rec.action(), SyncAction::Create);

        rec.node_version = Some(NodeVersion(3));
        assert_eq!(rec.action(), SyncAction::Update);
    }

    #[test]
    fn needs_sync_only_when_some_record_unsynced() {
        let plan = SyncPlan {
            bucket: BucketName::from("b"),
            prefix: "p/".to_string(),
            records: vec![record("/a", true), record("/b", true)],
        };
        assert!(!plan.needs_sync());

        let plan = SyncPlan {
            records: vec![record("/a", true), record("/b", false)],
            ..plan
        };
        assert!(plan.needs_sync());
        assert_eq!(plan.pending().count(), 1);
    }

    #[test]
    fn plan_serde_roundtrip() {
        let plan = SyncPlan {
            bucket: BucketName::from("solr-config"),
            prefix: "TAG2/".to_string(),
            records: vec![record("/a.txt", false)],
        };
        let json = serde_json::to_string(&plan).expect("serialize");
        let back: SyncPlan = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(plan, back);
    }
}
