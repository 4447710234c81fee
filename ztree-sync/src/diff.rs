//! Content-fingerprint diff against the tree store.

use ztree_core::{fingerprint, ObjectRecord};

use crate::error::SyncError;
use crate::store::TreeStore;

/// Classify every record against the current tree state.
///
/// Returns a new collection; the input is left untouched. Per record: an
/// absent node means a write is needed; a present node is read, hashed and
/// compared against the normalized source fingerprint. Store errors
/// propagate immediately — no retry at this layer.
pub fn classify<T: TreeStore + ?Sized>(
    tree: &T,
    records: &[ObjectRecord],
) -> Result<Vec<ObjectRecord>, SyncError> {
    let mut classified = Vec::with_capacity(records.len());
    for record in records {
        let mut record = record.clone();
        let path = record.target_path.as_str();
        log::debug!("checking {} against node {path}", record.key);

        let version = tree.exists(path).map_err(|source| SyncError::Exists {
            path: path.to_string(),
            source,
        })?;
        record.checked = true;
        record.node_version = version;

        match version {
            None => {
                record.needs_write = true;
                record.synced = false;
                log::warn!("node {path} is absent; {} will be uploaded", record.key);
            }
            Some(_) => {
                // A NotFound here means the node was deleted between the
                // existence check and the read; it propagates like any
                // other read failure.
                let data = tree.get_bytes(path).map_err(|source| SyncError::Read {
                    path: path.to_string(),
                    source,
                })?;
                let tree_fingerprint = fingerprint::hash(&data);
                if fingerprint::equal(&tree_fingerprint, &record.source_fingerprint) {
                    record.needs_write = false;
                    record.synced = true;
                    log::debug!("node {path} is up to date");
                } else {
                    record.needs_write = true;
                    record.synced = false;
                    log::warn!("node {path} differs; {} will be uploaded", record.key);
                }
            }
        }
        classified.push(record);
    }
    Ok(classified)
}

#[cfg(test)]
mod tests {
    use ztree_core::{ListingEntry, NodeVersion, ObjectKey, SyncAction};

    use crate::memory::MemoryTreeStore;

    use super::*;

    fn record(key: &str, prefix: &str, fingerprint: &str) -> ObjectRecord {
        ObjectRecord::from_listing(
            prefix,
            &ListingEntry {
                key: ObjectKey::from(key),
                raw_fingerprint: fingerprint.to_string(),
            },
        )
    }

    #[test]
    fn absent_node_needs_create() {
        let tree = MemoryTreeStore::new();
        let records = vec![record("TAG2/x", "TAG2/", "deadbeef")];

        let classified = classify(&tree, &records).unwrap();
        let rec = &classified[0];
        assert!(rec.checked && rec.needs_write && !rec.synced);
        assert_eq!(rec.action(), SyncAction::Create);
    }

    #[test]
    fn matching_content_is_in_sync() {
        let tree = MemoryTreeStore::new();
        tree.seed("/x", b"hello");
        let records = vec![record("TAG2/x", "TAG2/", &fingerprint::hash(b"hello"))];

        let classified = classify(&tree, &records).unwrap();
        let rec = &classified[0];
        assert!(rec.checked && !rec.needs_write && rec.synced);
        assert_eq!(rec.action(), SyncAction::InSync);
        assert_eq!(rec.node_version, Some(NodeVersion(0)));
    }

    #[test]
    fn differing_content_needs_update() {
        let tree = MemoryTreeStore::new();
        tree.seed("/x", b"stale");
        let records = vec![record("TAG2/x", "TAG2/", &fingerprint::hash(b"fresh"))];

        let classified = classify(&tree, &records).unwrap();
        let rec = &classified[0];
        assert!(rec.needs_write && !rec.synced);
        assert_eq!(rec.action(), SyncAction::Update);
    }

    #[test]
    fn quoting_and_newline_artifacts_do_not_break_equality() {
        let tree = MemoryTreeStore::new();
        tree.seed("/x", b"hello");
        // Quoted ETag from the listing side; content hash on the tree side.
        let quoted = format!("\"{}\"", fingerprint::hash(b"hello"));
        let records = vec![record("TAG2/x", "TAG2/", &quoted)];

        let classified = classify(&tree, &records).unwrap();
        assert!(classified[0].synced);
    }

    #[test]
    fn input_records_are_not_mutated() {
        let tree = MemoryTreeStore::new();
        let records = vec![record("TAG2/x", "TAG2/", "deadbeef")];
        let before = records.clone();

        let _ = classify(&tree, &records).unwrap();
        assert_eq!(records, before);
    }
}
