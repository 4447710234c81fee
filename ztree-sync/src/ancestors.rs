//! Idempotent ancestor-path materialization.
//!
//! A node in the coordination tree cannot be created until its parent
//! exists. Before a leaf write, every proper ancestor of the target path is
//! created as an empty node, root-to-leaf. The walk is a plain loop over the
//! path segments, so depth is bounded by the key, not the stack.

use ztree_core::NodePath;

use crate::error::SyncError;
use crate::store::{StoreError, TreeAcl, TreeStore};

/// Ensure every proper ancestor of `path` exists, creating empty nodes with
/// `acl` where needed. The leaf itself is never created here.
///
/// Safe to call repeatedly, and tolerant of concurrent callers: a create
/// that loses the race to another writer (`AlreadyExists`) is a non-error.
/// Any other create failure aborts and propagates; ancestors created so far
/// stay in place — a later retry picks up where this one stopped.
pub fn ensure_ancestors<T: TreeStore + ?Sized>(
    tree: &T,
    path: &NodePath,
    acl: &TreeAcl,
) -> Result<(), SyncError> {
    log::info!("ensuring ancestors of {path}");
    for ancestor in path.proper_ancestors() {
        let exists = tree
            .exists(ancestor.as_str())
            .map_err(|source| SyncError::Exists {
                path: ancestor.as_str().to_string(),
                source,
            })?
            .is_some();
        if exists {
            continue;
        }
        log::debug!("creating ancestor {ancestor}");
        match tree.create(ancestor.as_str(), &[], acl) {
            Ok(()) => {}
            // Another writer got there first between the check and the
            // create; the node exists, which is all that matters.
            Err(StoreError::AlreadyExists) => {}
            Err(source) => {
                return Err(SyncError::CreateAncestor {
                    path: path.as_str().to_string(),
                    ancestor: ancestor.as_str().to_string(),
                    source,
                });
            }
        }
    }
    Ok(())
}
