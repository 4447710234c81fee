//! Store boundary: the collaborator capabilities the engine consumes.
//!
//! The engine never owns a connection. Both stores are long-lived handles
//! borrowed for the duration of one run; adapters over real clients live in
//! the CLI crate, and [`crate::memory`] provides in-memory reference
//! implementations.

use thiserror::Error;

use ztree_core::{BucketName, ListingEntry, NodeVersion, ObjectKey};

/// Failure kinds a store call can report.
///
/// Adapters map their client's errors onto these kinds; everything the
/// engine has no special handling for goes through [`StoreError::Backend`].
#[derive(Debug, Error)]
pub enum StoreError {
    /// The addressed object or node does not exist.
    #[error("not found")]
    NotFound,

    /// Create raced with another writer; the node is already there.
    #[error("node already exists")]
    AlreadyExists,

    /// Update was issued with a stale version token.
    #[error("version conflict")]
    VersionConflict,

    /// Any other client-level failure.
    #[error(transparent)]
    Backend(Box<dyn std::error::Error + Send + Sync>),
}

impl StoreError {
    pub fn backend(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Backend(Box::new(err))
    }
}

/// Access-control descriptor applied to every node the engine creates,
/// ancestors included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeAcl {
    pub scheme: String,
    pub id: String,
    /// Permission bitmask in the coordination store's encoding.
    pub perms: u32,
}

/// All permissions (read, write, create, delete, admin).
pub const PERMS_ALL: u32 = 31;

impl TreeAcl {
    /// The permissive `world:anyone` ACL with all permissions.
    pub fn world_anyone() -> Self {
        Self {
            scheme: "world".to_string(),
            id: "anyone".to_string(),
            perms: PERMS_ALL,
        }
    }
}

impl Default for TreeAcl {
    fn default() -> Self {
        Self::world_anyone()
    }
}

/// Flat, prefix-addressed remote object store.
pub trait ObjectStore {
    /// Full listing under `prefix`, pagination drained.
    fn list(&self, bucket: &BucketName, prefix: &str) -> Result<Vec<ListingEntry>, StoreError>;

    /// Fetch an object's bytes. [`StoreError::NotFound`] if the key vanished
    /// between listing and fetch.
    fn get_bytes(&self, bucket: &BucketName, key: &ObjectKey) -> Result<Vec<u8>, StoreError>;
}

/// Hierarchical coordination-tree store with versioned nodes.
pub trait TreeStore {
    /// Existence check; returns the node's version token when present.
    fn exists(&self, path: &str) -> Result<Option<NodeVersion>, StoreError>;

    /// Read a node's payload.
    fn get_bytes(&self, path: &str) -> Result<Vec<u8>, StoreError>;

    /// Create a node. The parent must already exist.
    fn create(&self, path: &str, data: &[u8], acl: &TreeAcl) -> Result<(), StoreError>;

    /// Optimistic-concurrency update: fails with
    /// [`StoreError::VersionConflict`] when `version` is stale.
    fn update(&self, path: &str, data: &[u8], version: NodeVersion) -> Result<(), StoreError>;

    /// Names of a node's direct children.
    fn children(&self, path: &str) -> Result<Vec<String>, StoreError>;
}
