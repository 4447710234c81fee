//! Depth-first tree walking over the children listing.

use crate::error::SyncError;
use crate::store::TreeStore;

/// Paths of every leaf node at or under `root`.
///
/// A node with no children counts as a leaf, `root` itself included.
/// Children are visited in sorted order so the output is deterministic, and
/// the walk uses an explicit stack — tree depth never grows the call stack.
pub fn leaf_paths<T: TreeStore + ?Sized>(tree: &T, root: &str) -> Result<Vec<String>, SyncError> {
    let mut leaves = Vec::new();
    let mut stack = vec![root.to_string()];

    while let Some(path) = stack.pop() {
        log::debug!("walking {path}");
        let mut children = tree
            .children(&path)
            .map_err(|source| SyncError::Children {
                path: path.clone(),
                source,
            })?;
        if children.is_empty() {
            leaves.push(path);
            continue;
        }
        children.sort();
        // Reverse push keeps pop order sorted.
        for child in children.into_iter().rev() {
            if path == "/" {
                stack.push(format!("/{child}"));
            } else {
                stack.push(format!("{path}/{child}"));
            }
        }
    }
    Ok(leaves)
}

#[cfg(test)]
mod tests {
    use crate::memory::MemoryTreeStore;

    use super::*;

    #[test]
    fn lists_leaves_depth_first_sorted() {
        let tree = MemoryTreeStore::new();
        tree.seed("/a/one", b"1");
        tree.seed("/a/two", b"2");
        tree.seed("/b", b"3");

        let leaves = leaf_paths(&tree, "/").unwrap();
        assert_eq!(leaves, vec!["/a/one", "/a/two", "/b"]);
    }

    #[test]
    fn childless_root_is_its_own_leaf() {
        let tree = MemoryTreeStore::new();
        tree.seed("/only", b"");
        assert_eq!(leaf_paths(&tree, "/only").unwrap(), vec!["/only"]);
    }

    #[test]
    fn missing_root_propagates_error() {
        let tree = MemoryTreeStore::new();
        let err = leaf_paths(&tree, "/nope").unwrap_err();
        assert!(matches!(err, SyncError::Children { ref path, .. } if path == "/nope"));
        assert_eq!(err.to_string(), "listing children of /nope failed: not found");
    }
}
