//! # ztree-core
//!
//! Domain layer for the ztree reconciler: strongly-typed names, the
//! per-run [`SyncPlan`](types::SyncPlan) and its [`ObjectRecord`](types::ObjectRecord)s,
//! key→node-path mapping, and the content-fingerprint codec.
//!
//! This crate is pure — no I/O and no store clients. The store boundary and
//! the reconciliation engine live in `ztree-sync`.

pub mod fingerprint;
pub mod path;
pub mod types;

pub use types::{
    BucketName, ListingEntry, NodePath, NodeVersion, ObjectKey, ObjectRecord, SyncAction, SyncPlan,
};
