//! # ztree-sync
//!
//! Reconciliation engine: diff a flat object store listing against a
//! hierarchical coordination-tree store and converge the tree.
//!
//! Build a [`Syncer`] over an [`ObjectStore`] and a [`TreeStore`], call
//! [`Syncer::compute_plan`] to classify every object, then
//! [`Syncer::apply_plan`] to materialize ancestors and write the nodes that
//! differ.

pub mod ancestors;
pub mod diff;
pub mod error;
pub mod memory;
pub mod store;
pub mod sync;
pub mod walk;

pub use error::SyncError;
pub use store::{ObjectStore, StoreError, TreeAcl, TreeStore};
pub use sync::{FailurePolicy, SyncFailure, SyncOutcome, Syncer};
