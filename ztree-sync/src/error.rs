//! Error types for ztree-sync.
//!
//! Every collaborator failure is wrapped with the operation and the path or
//! key it concerned, then returned unchanged in kind — the engine never
//! recovers locally. Re-running a plan after a failure is always safe;
//! existence checks and ancestor creation are idempotent.

use thiserror::Error;

use ztree_core::NodeVersion;

use crate::store::StoreError;

/// All errors that can arise from plan computation and application.
#[derive(Debug, Error)]
pub enum SyncError {
    /// A bucket name is required to address the object store.
    #[error("bucket name is required")]
    EmptyBucket,

    /// Listing the source store failed.
    #[error("listing {bucket}/{prefix} failed: {source}")]
    List {
        bucket: String,
        prefix: String,
        #[source]
        source: StoreError,
    },

    /// The object disappeared between listing and fetch.
    #[error("object {bucket}/{key} vanished before fetch")]
    ObjectVanished { bucket: String, key: String },

    /// Fetching an object's bytes failed.
    #[error("fetching {bucket}/{key} failed: {source}")]
    Fetch {
        bucket: String,
        key: String,
        #[source]
        source: StoreError,
    },

    /// Existence check on a tree node failed.
    #[error("existence check at {path} failed: {source}")]
    Exists {
        path: String,
        #[source]
        source: StoreError,
    },

    /// Reading a tree node's payload failed.
    #[error("reading node {path} failed: {source}")]
    Read {
        path: String,
        #[source]
        source: StoreError,
    },

    /// Listing a tree node's children failed.
    #[error("listing children of {path} failed: {source}")]
    Children {
        path: String,
        #[source]
        source: StoreError,
    },

    /// Creating an ancestor node failed; materialization aborted.
    #[error("creating ancestor {ancestor} of {path} failed: {source}")]
    CreateAncestor {
        path: String,
        ancestor: String,
        #[source]
        source: StoreError,
    },

    /// Writing the leaf node failed.
    #[error("writing node {path} failed: {source}")]
    Write {
        path: String,
        #[source]
        source: StoreError,
    },

    /// The versioned update raced with another writer. Retryable: re-run
    /// the plan to re-read the version.
    #[error("version conflict writing {path} (had version {version:?})")]
    WriteConflict {
        path: String,
        version: Option<NodeVersion>,
    },
}
