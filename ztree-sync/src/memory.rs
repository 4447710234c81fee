//! In-memory reference stores.
//!
//! Faithful enough to stand in for the real collaborators in tests: the tree
//! store enforces parent-must-exist on create, counts versions per node, and
//! keeps an operation log so ordering can be asserted; the object store
//! reports S3-style quoted MD5 ETags as raw fingerprints.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use ztree_core::{fingerprint, BucketName, ListingEntry, NodeVersion, ObjectKey};

use crate::store::{ObjectStore, StoreError, TreeAcl, TreeStore};

// ---------------------------------------------------------------------------
// Tree store
// ---------------------------------------------------------------------------

/// One store call, recorded in listing order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeOp {
    Exists(String),
    Read(String),
    Create(String),
    Update(String),
    Children(String),
}

#[derive(Debug, Clone)]
struct Node {
    data: Vec<u8>,
    version: i32,
    acl: TreeAcl,
}

#[derive(Debug, Default)]
struct TreeInner {
    nodes: BTreeMap<String, Node>,
    ops: Vec<TreeOp>,
    fail_write_at: Option<String>,
}

/// In-memory hierarchical store with versioned nodes.
#[derive(Debug, Default)]
pub struct MemoryTreeStore {
    inner: Mutex<TreeInner>,
}

impl MemoryTreeStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, TreeInner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Insert a node directly, materializing missing ancestors, without
    /// touching the op log. Test seeding only.
    pub fn seed(&self, path: &str, data: &[u8]) {
        let mut inner = self.lock();
        let trimmed = path.trim_start_matches('/');
        let mut accumulated = String::new();
        for segment in trimmed.split('/') {
            accumulated.push('/');
            accumulated.push_str(segment);
            let payload = if accumulated[1..] == *trimmed {
                data.to_vec()
            } else {
                Vec::new()
            };
            inner.nodes.entry(accumulated.clone()).or_insert(Node {
                data: payload,
                version: 0,
                acl: TreeAcl::world_anyone(),
            });
        }
    }

    /// Make the next create/update at `path` fail with a backend error.
    pub fn fail_next_write_at(&self, path: &str) {
        self.lock().fail_write_at = Some(path.to_string());
    }

    pub fn contains(&self, path: &str) -> bool {
        self.lock().nodes.contains_key(path)
    }

    pub fn node_data(&self, path: &str) -> Option<Vec<u8>> {
        self.lock().nodes.get(path).map(|node| node.data.clone())
    }

    pub fn node_version(&self, path: &str) -> Option<NodeVersion> {
        self.lock().nodes.get(path).map(|node| NodeVersion(node.version))
    }

    pub fn node_acl(&self, path: &str) -> Option<TreeAcl> {
        self.lock().nodes.get(path).map(|node| node.acl.clone())
    }

    /// The recorded call sequence so far.
    pub fn ops(&self) -> Vec<TreeOp> {
        self.lock().ops.clone()
    }

    /// Only the create calls, in order.
    pub fn created_paths(&self) -> Vec<String> {
        self.lock()
            .ops
            .iter()
            .filter_map(|op| match op {
                TreeOp::Create(path) => Some(path.clone()),
                _ => None,
            })
            .collect()
    }

    fn take_injected_failure(inner: &mut TreeInner, path: &str) -> Option<StoreError> {
        if inner.fail_write_at.as_deref() == Some(path) {
            inner.fail_write_at = None;
            return Some(StoreError::backend(std::io::Error::other(
                "injected write failure",
            )));
        }
        None
    }

    fn parent_exists(inner: &TreeInner, path: &str) -> bool {
        match path.rfind('/') {
            // Children of the root need no parent node.
            Some(0) | None => true,
            Some(idx) => inner.nodes.contains_key(&path[..idx]),
        }
    }
}

impl TreeStore for MemoryTreeStore {
    fn exists(&self, path: &str) -> Result<Option<NodeVersion>, StoreError> {
        let mut inner = self.lock();
        inner.ops.push(TreeOp::Exists(path.to_string()));
        Ok(inner.nodes.get(path).map(|node| NodeVersion(node.version)))
    }

    fn get_bytes(&self, path: &str) -> Result<Vec<u8>, StoreError> {
        let mut inner = self.lock();
        inner.ops.push(TreeOp::Read(path.to_string()));
        inner
            .nodes
            .get(path)
            .map(|node| node.data.clone())
            .ok_or(StoreError::NotFound)
    }

    fn create(&self, path: &str, data: &[u8], acl: &TreeAcl) -> Result<(), StoreError> {
        let mut inner = self.lock();
        inner.ops.push(TreeOp::Create(path.to_string()));
        if let Some(err) = Self::take_injected_failure(&mut inner, path) {
            return Err(err);
        }
        if inner.nodes.contains_key(path) {
            return Err(StoreError::AlreadyExists);
        }
        if !Self::parent_exists(&inner, path) {
            return Err(StoreError::NotFound);
        }
        inner.nodes.insert(
            path.to_string(),
            Node {
                data: data.to_vec(),
                version: 0,
                acl: acl.clone(),
            },
        );
        Ok(())
    }

    fn update(&self, path: &str, data: &[u8], version: NodeVersion) -> Result<(), StoreError> {
        let mut inner = self.lock();
        inner.ops.push(TreeOp::Update(path.to_string()));
        if let Some(err) = Self::take_injected_failure(&mut inner, path) {
            return Err(err);
        }
        let node = inner.nodes.get_mut(path).ok_or(StoreError::NotFound)?;
        if node.version != version.0 {
            return Err(StoreError::VersionConflict);
        }
        node.data = data.to_vec();
        node.version += 1;
        Ok(())
    }

    fn children(&self, path: &str) -> Result<Vec<String>, StoreError> {
        let mut inner = self.lock();
        inner.ops.push(TreeOp::Children(path.to_string()));
        if path != "/" && !inner.nodes.contains_key(path) {
            return Err(StoreError::NotFound);
        }
        let prefix = if path == "/" {
            "/".to_string()
        } else {
            format!("{path}/")
        };
        Ok(inner
            .nodes
            .keys()
            .filter_map(|candidate| {
                let rest = candidate.strip_prefix(&prefix)?;
                (!rest.is_empty() && !rest.contains('/')).then(|| rest.to_string())
            })
            .collect())
    }
}

// ---------------------------------------------------------------------------
// Object store
// ---------------------------------------------------------------------------

/// In-memory flat object store holding a single bucket.
#[derive(Debug)]
pub struct MemoryObjectStore {
    bucket: BucketName,
    objects: Mutex<BTreeMap<String, Vec<u8>>>,
}

impl MemoryObjectStore {
    pub fn new(bucket: impl Into<BucketName>) -> Self {
        Self {
            bucket: bucket.into(),
            objects: Mutex::new(BTreeMap::new()),
        }
    }

    pub fn put(&self, key: &str, data: &[u8]) {
        self.objects
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(key.to_string(), data.to_vec());
    }

    /// Drop an object, as if it vanished between listing and fetch.
    pub fn remove(&self, key: &str) {
        self.objects
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .remove(key);
    }
}

impl ObjectStore for MemoryObjectStore {
    fn list(&self, bucket: &BucketName, prefix: &str) -> Result<Vec<ListingEntry>, StoreError> {
        if *bucket != self.bucket {
            return Err(StoreError::NotFound);
        }
        let objects = self
            .objects
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Ok(objects
            .iter()
            .filter(|(key, _)| key.starts_with(prefix))
            .map(|(key, data)| ListingEntry {
                key: ObjectKey::from(key.as_str()),
                // S3 quotes simple-upload ETags.
                raw_fingerprint: format!("\"{}\"", fingerprint::hash(data)),
            })
            .collect())
    }

    fn get_bytes(&self, bucket: &BucketName, key: &ObjectKey) -> Result<Vec<u8>, StoreError> {
        if *bucket != self.bucket {
            return Err(StoreError::NotFound);
        }
        self.objects
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(key.as_str())
            .cloned()
            .ok_or(StoreError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_requires_parent() {
        let tree = MemoryTreeStore::new();
        let acl = TreeAcl::world_anyone();
        let err = tree.create("/a/b", b"x", &acl).unwrap_err();
        assert!(matches!(err, StoreError::NotFound));

        tree.create("/a", b"", &acl).unwrap();
        tree.create("/a/b", b"x", &acl).unwrap();
        assert_eq!(tree.node_data("/a/b"), Some(b"x".to_vec()));
    }

    #[test]
    fn update_bumps_version_and_checks_token() {
        let tree = MemoryTreeStore::new();
        tree.seed("/n", b"v0");
        tree.update("/n", b"v1", NodeVersion(0)).unwrap();
        assert_eq!(tree.node_version("/n"), Some(NodeVersion(1)));

        let err = tree.update("/n", b"v2", NodeVersion(0)).unwrap_err();
        assert!(matches!(err, StoreError::VersionConflict));
    }

    #[test]
    fn children_lists_direct_names_only() {
        let tree = MemoryTreeStore::new();
        tree.seed("/a/b/c", b"leaf");
        tree.seed("/a/d", b"leaf");
        assert_eq!(tree.children("/a").unwrap(), vec!["b", "d"]);
        assert_eq!(tree.children("/").unwrap(), vec!["a"]);
        assert!(tree.children("/a/b").unwrap() == vec!["c"]);
    }

    #[test]
    fn listing_filters_by_prefix_and_quotes_etags() {
        let store = MemoryObjectStore::new("bucket");
        store.put("TAG2/a.txt", b"hello");
        store.put("OTHER/b.txt", b"nope");

        let listing = store.list(&BucketName::from("bucket"), "TAG2/").unwrap();
        assert_eq!(listing.len(), 1);
        assert_eq!(listing[0].key.as_str(), "TAG2/a.txt");
        assert_eq!(
            listing[0].raw_fingerprint,
            "\"5d41402abc4b2a76b9719d911017c592\""
        );
    }
}
