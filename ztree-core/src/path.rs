//! Flat object keys → hierarchical tree paths.
//!
//! The mapping is injective for a fixed listing prefix: distinct keys yield
//! distinct target paths, and every result carries exactly one leading
//! separator.

use crate::types::NodePath;

/// The tree-store path separator.
pub const SEPARATOR: char = '/';

/// Map an object key under `prefix` to its target tree path.
///
/// Strips `prefix` from the front of `key` and ensures a single leading
/// separator. A key that does not start with `prefix` is mapped best-effort:
/// the whole key gets a leading separator instead of failing the run.
pub fn node_path(prefix: &str, key: &str) -> NodePath {
    let stripped = key.strip_prefix(prefix).unwrap_or(key);
    NodePath::from(stripped)
}

/// Every proper ancestor of `path`, root-to-leaf.
///
/// `/a/b/c` yields `/a` then `/a/b`. The leaf itself is never included, so a
/// single-segment path yields nothing. Built with an explicit loop over the
/// segments; depth is bounded only by the key length, not the stack.
pub fn proper_ancestors(path: &NodePath) -> Vec<NodePath> {
    let target = path.as_str().trim_start_matches(SEPARATOR);
    let mut ancestors = Vec::new();
    let mut accumulated = String::new();
    for segment in target.split(SEPARATOR) {
        accumulated.push(SEPARATOR);
        accumulated.push_str(segment);
        // Reached the leaf; creating it is the caller's responsibility.
        if accumulated[1..] == *target {
            break;
        }
        ancestors.push(NodePath::from(accumulated.clone()));
    }
    ancestors
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("TAG2/", "TAG2/a.txt", "/a.txt")]
    #[case("TAG2/", "TAG2/sub/b.txt", "/sub/b.txt")]
    #[case("configs", "configs/solr.xml", "/solr.xml")]
    #[case("/", "/already/rooted", "/already/rooted")]
    #[case("", "plain.txt", "/plain.txt")]
    fn maps_key_under_prefix(#[case] prefix: &str, #[case] key: &str, #[case] expected: &str) {
        assert_eq!(node_path(prefix, key).as_str(), expected);
    }

    #[test]
    fn key_outside_prefix_maps_best_effort() {
        // Listing oddity, not a hard error: the unstripped key is rooted.
        assert_eq!(node_path("TAG2/", "OTHER/x.txt").as_str(), "/OTHER/x.txt");
    }

    #[test]
    fn mapping_is_injective_with_single_leading_separator() {
        let keys = ["TAG2/a", "TAG2/b", "TAG2/sub/a", "TAG2/sub/b", "TAG2/sub2/a"];
        let paths: HashSet<_> = keys.iter().map(|k| node_path("TAG2/", k)).collect();
        assert_eq!(paths.len(), keys.len());
        for p in &paths {
            assert!(p.as_str().starts_with(SEPARATOR));
            assert!(!p.as_str().starts_with("//"));
        }
    }

    #[rstest]
    #[case("/a.txt", &[])]
    #[case("/sub/b.txt", &["/sub"])]
    #[case("/a/b/c", &["/a", "/a/b"])]
    #[case("/deep/er/and/deeper/leaf", &["/deep", "/deep/er", "/deep/er/and", "/deep/er/and/deeper"])]
    fn ancestors_in_root_to_leaf_order(#[case] path: &str, #[case] expected: &[&str]) {
        let got: Vec<String> = proper_ancestors(&NodePath::from(path))
            .into_iter()
            .map(|p| p.as_str().to_string())
            .collect();
        assert_eq!(got, expected);
    }
}
