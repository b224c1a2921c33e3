//! Enumeration of terminal key-paths.
//!
//! Used to discover candidate field mappings in a response shape we have not
//! seen before: run it over a saved response and pick the paths of interest.

use serde_json::{Map, Value};

use super::path::KeyPath;

/// Maximum number of nested mappings followed before a subtree is skipped.
pub const MAX_DEPTH: usize = 64;

/// Lazily enumerate every terminal key-path in `tree`.
///
/// Mapping values are descended with their key appended. Sequence values are
/// descended element by element, reusing the same prefix, but only elements
/// that are themselves mappings contribute. Every other value ends a path.
/// Roots that are not mappings produce nothing.
pub fn key_paths(tree: &Value) -> KeyPaths<'_> {
    KeyPaths::new(tree)
}

/// Collect [`key_paths`] into a fresh vector.
pub fn extract_key_paths(tree: &Value) -> Vec<KeyPath> {
    key_paths(tree).collect()
}

/// Iterator returned by [`key_paths`].
///
/// Walks with an explicit stack, so arbitrarily deep responses cannot
/// overflow the call stack. Cloning the iterator gives an independent cursor.
#[derive(Debug, Clone)]
pub struct KeyPaths<'a> {
    stack: Vec<Frame<'a>>,
}

#[derive(Debug, Clone)]
enum Frame<'a> {
    Entries {
        prefix: KeyPath,
        entries: std::vec::IntoIter<(&'a String, &'a Value)>,
        depth: usize,
    },
    Items {
        prefix: KeyPath,
        items: std::slice::Iter<'a, Value>,
        depth: usize,
    },
}

impl<'a> KeyPaths<'a> {
    fn new(tree: &'a Value) -> Self {
        let mut paths = Self { stack: Vec::new() };
        if let Value::Object(map) = tree {
            paths.descend(KeyPath::new(), map, 1);
        }
        paths
    }

    fn descend(&mut self, prefix: KeyPath, map: &'a Map<String, Value>, depth: usize) {
        if depth > MAX_DEPTH {
            tracing::debug!(path = %prefix, "Skipping subtree beyond maximum depth");
            return;
        }
        self.stack.push(Frame::Entries {
            prefix,
            entries: map.iter().collect::<Vec<_>>().into_iter(),
            depth,
        });
    }
}

impl<'a> Iterator for KeyPaths<'a> {
    type Item = KeyPath;

    fn next(&mut self) -> Option<KeyPath> {
        loop {
            match self.stack.last_mut()? {
                Frame::Entries {
                    prefix,
                    entries,
                    depth,
                } => {
                    let Some((key, value)) = entries.next() else {
                        self.stack.pop();
                        continue;
                    };
                    let path = prefix.child(key.as_str());
                    let depth = *depth;
                    match value {
                        Value::Object(map) => self.descend(path, map, depth + 1),
                        Value::Array(items) => self.stack.push(Frame::Items {
                            prefix: path,
                            items: items.iter(),
                            depth,
                        }),
                        _ => return Some(path),
                    }
                }
                Frame::Items {
                    prefix,
                    items,
                    depth,
                } => {
                    let Some(item) = items.next() else {
                        self.stack.pop();
                        continue;
                    };
                    if let Value::Object(map) = item {
                        let prefix = prefix.clone();
                        let depth = *depth;
                        self.descend(prefix, map, depth + 1);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::canonical_response;
    use crate::tree::resolve_path;
    use serde_json::json;

    fn paths(tree: &Value) -> Vec<String> {
        extract_key_paths(tree)
            .iter()
            .map(|p| p.to_string())
            .collect()
    }

    #[test]
    fn test_flat_mapping_one_path_per_key() {
        let tree = json!({"timezone": "Europe/Moscow", "timestamp": 1707128597475u64, "ok": true});
        let found = extract_key_paths(&tree);
        assert_eq!(
            found,
            vec![
                KeyPath::from("timezone"),
                KeyPath::from("timestamp"),
                KeyPath::from("ok"),
            ]
        );
        assert!(found.iter().all(|p| p.len() == 1));
    }

    #[test]
    fn test_nested_mappings_extend_prefix() {
        let tree = json!({"track": {"genres": {"primary": "Dance"}, "isrc": "USQX91801629"}});
        assert_eq!(paths(&tree), vec!["track.genres.primary", "track.isrc"]);
    }

    #[test]
    fn test_sequences_reuse_prefix() {
        let tree = json!({
            "matches": [{"id": "1"}, {"id": "2", "offset": 77.9}],
            "tags": ["a", "b"]
        });
        assert_eq!(paths(&tree), vec!["matches.id", "matches.id", "matches.offset"]);
    }

    #[test]
    fn test_null_values_terminate_paths() {
        let tree = json!({"track": {"isrc": null}});
        assert_eq!(paths(&tree), vec!["track.isrc"]);
    }

    #[test]
    fn test_non_mapping_root_yields_nothing() {
        assert!(extract_key_paths(&json!([{"a": 1}])).is_empty());
        assert!(extract_key_paths(&json!("scalar")).is_empty());
        assert!(extract_key_paths(&json!({})).is_empty());
    }

    #[test]
    fn test_calls_do_not_share_state() {
        let tree = json!({"a": 1});
        assert_eq!(extract_key_paths(&tree).len(), 1);
        assert_eq!(extract_key_paths(&tree).len(), 1);
    }

    #[test]
    fn test_iterator_is_restartable_by_clone() {
        let tree = canonical_response();
        let mut iter = key_paths(&tree);
        iter.next();
        let rest: Vec<_> = iter.clone().collect();
        assert_eq!(rest, iter.collect::<Vec<_>>());
    }

    #[test]
    fn test_canonical_response_contains_mapped_paths() {
        let tree = canonical_response();
        let found = extract_key_paths(&tree);
        assert!(found.contains(&KeyPath::from(["track", "genres", "primary"])));
        assert!(found.contains(&KeyPath::from(["track", "urlparams", "{tracktitle}"])));
        assert!(found.contains(&KeyPath::from(["track", "sections", "metadata", "title"])));
    }

    #[test]
    fn test_paths_without_sequences_resolve_to_scalars() {
        let tree = json!({"track": {"genres": {"primary": "Dance"}, "key": "432365947"}});
        for path in key_paths(&tree) {
            let value = resolve_path(&tree, &path).unwrap();
            assert!(!value.is_object() && !value.is_array());
        }
    }

    #[test]
    fn test_depth_is_bounded() {
        let mut tree = json!({"leaf": "x"});
        for _ in 0..(MAX_DEPTH * 4) {
            tree = json!({ "n": tree });
        }
        // Too deep to reach the leaf, but enumeration terminates quietly
        assert!(extract_key_paths(&tree).is_empty());

        let mut shallow = json!({"leaf": "x"});
        for _ in 0..(MAX_DEPTH - 1) {
            shallow = json!({ "n": shallow });
        }
        assert_eq!(extract_key_paths(&shallow).len(), 1);
    }
}
