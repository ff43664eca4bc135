//! Tuple-keyed tree dictionaries.
//!
//! A [`TreeMap`] stores scalar values under [`Key`]s of arbitrary length and
//! treats them as a dictionary of dictionaries: looking up a key that is only
//! a prefix of stored keys yields a new, smaller tree holding the remainders.
//!
//! ```rust
//! use treedictlib::{Node, Scalar, TreeMap};
//!
//! let tree = TreeMap::from_entries([
//!     (["run1", "cpu"], 0.5),
//!     (["run1", "mem"], 128.0),
//! ])
//! .unwrap();
//!
//! // Exact hit
//! assert_eq!(tree.get(["run1", "cpu"]).unwrap(), Node::Leaf(Scalar::Float(0.5)));
//!
//! // Prefix hit: a sub-tree keyed by the remainders
//! let run1 = tree.subtree("run1").unwrap();
//! assert_eq!(run1.get_value("mem"), Some(&Scalar::Float(128.0)));
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use tracing::debug;

use crate::error::TreeDictError;
use crate::key::Key;
use crate::scalar::Scalar;
use crate::Result;

/// Result of a [`TreeMap::get`] lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// The lookup key is stored exactly
    Leaf(Scalar),
    /// The lookup key is a prefix of one or more stored keys
    Tree(TreeMap),
}

impl Node {
    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf(_))
    }

    pub fn as_leaf(&self) -> Option<&Scalar> {
        match self {
            Node::Leaf(value) => Some(value),
            Node::Tree(_) => None,
        }
    }

    pub fn as_tree(&self) -> Option<&TreeMap> {
        match self {
            Node::Leaf(_) => None,
            Node::Tree(tree) => Some(tree),
        }
    }

    pub fn into_tree(self) -> Option<TreeMap> {
        match self {
            Node::Leaf(_) => None,
            Node::Tree(tree) => Some(tree),
        }
    }
}

/// An ordered mapping from tuple keys to scalar values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TreeMap {
    entries: BTreeMap<Key, Scalar>,
}

impl TreeMap {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a tree from `(key, value)` pairs. Later duplicates win.
    pub fn from_entries<I, K, V>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Key>,
        V: Into<Scalar>,
    {
        let mut tree = Self::new();
        for (key, value) in entries {
            tree.insert(key, value)?;
        }
        Ok(tree)
    }

    /// Build a tree from nested JSON.
    ///
    /// Each object nesting level becomes one key label, arrays use their
    /// indices as labels, and every other value is stored as a leaf. The
    /// root must be an object.
    pub fn from_nested(value: &serde_json::Value) -> Result<Self> {
        let serde_json::Value::Object(map) = value else {
            return Err(TreeDictError::InvalidInput(
                "top-level value must be an object".to_string(),
            ));
        };

        let mut tree = Self::new();
        for (label, child) in map {
            tree.insert_nested(Key::from(label), child);
        }
        debug!(entries = tree.len(), depth = tree.max_depth(), "built tree");
        Ok(tree)
    }

    /// Parse a JSON document and build a tree with [`TreeMap::from_nested`].
    pub fn from_json_str(json: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        Self::from_nested(&value)
    }

    fn insert_nested(&mut self, key: Key, value: &serde_json::Value) {
        match value {
            serde_json::Value::Object(map) => {
                for (label, child) in map {
                    self.insert_nested(key.child(label), child);
                }
            }
            serde_json::Value::Array(items) => {
                for (index, child) in items.iter().enumerate() {
                    self.insert_nested(key.child(index.to_string()), child);
                }
            }
            leaf => {
                if let Some(scalar) = Scalar::from_json(leaf) {
                    self.entries.insert(key, scalar);
                }
            }
        }
    }

    /// Store `value` under `key`, returning the value it replaced.
    pub fn insert(
        &mut self,
        key: impl Into<Key>,
        value: impl Into<Scalar>,
    ) -> Result<Option<Scalar>> {
        let key = key.into();
        if key.is_empty() {
            return Err(TreeDictError::EmptyKey);
        }
        Ok(self.entries.insert(key, value.into()))
    }

    /// Look up `key`.
    ///
    /// An exact entry is returned as [`Node::Leaf`]. Otherwise every entry
    /// whose key starts with `key` is collected, with the matched prefix
    /// removed, into a new [`Node::Tree`]. Fails with
    /// [`TreeDictError::KeyNotFound`] when neither exists.
    pub fn get(&self, key: impl Into<Key>) -> Result<Node> {
        let key = key.into();
        if let Some(value) = self.entries.get(&key) {
            return Ok(Node::Leaf(value.clone()));
        }

        let sub = self.collect_under(&key);
        if sub.is_empty() {
            debug!(key = %key, "lookup matched no entries");
            return Err(TreeDictError::KeyNotFound(key));
        }
        Ok(Node::Tree(sub))
    }

    /// Exact lookup only.
    pub fn get_value(&self, key: impl Into<Key>) -> Option<&Scalar> {
        self.entries.get(&key.into())
    }

    /// Prefix lookup only: the entries strictly below `prefix`.
    ///
    /// Unlike [`TreeMap::get`], an entry stored exactly at `prefix` does not
    /// shadow deeper entries.
    pub fn subtree(&self, prefix: impl Into<Key>) -> Result<TreeMap> {
        let prefix = prefix.into();
        let sub = self.collect_under(&prefix);
        if sub.is_empty() {
            return Err(TreeDictError::KeyNotFound(prefix));
        }
        Ok(sub)
    }

    /// Entries strictly longer than `prefix` that start with it, re-keyed by
    /// their remainders.
    fn collect_under(&self, prefix: &Key) -> TreeMap {
        // Keys sharing a prefix are contiguous in tuple order, starting at the prefix itself.
        let entries = self
            .entries
            .range::<Key, _>(prefix..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .filter(|(key, _)| key.len() > prefix.len())
            .filter_map(|(key, value)| {
                key.strip_prefix(prefix)
                    .map(|rest| (rest, value.clone()))
            })
            .collect();
        TreeMap { entries }
    }

    pub fn contains_key(&self, key: impl Into<Key>) -> bool {
        self.entries.contains_key(&key.into())
    }

    /// Stored keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &Key> {
        self.entries.keys()
    }

    /// Stored entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&Key, &Scalar)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Length of the longest key (0 for an empty tree).
    pub fn max_depth(&self) -> usize {
        self.entries.keys().map(Key::len).max().unwrap_or(0)
    }

    /// Distinct prefixes of length `depth`, sorted.
    pub fn prefixes(&self, depth: usize) -> Vec<Key> {
        self.entries
            .keys()
            .filter(|key| key.len() >= depth)
            .map(|key| key.prefix(depth))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Render the tree in a directory-like layout.
    ///
    /// Labels shared with the previous key are omitted, each remaining label
    /// goes on its own line indented by its depth, and the last label carries
    /// the value:
    ///
    /// ```text
    /// run1
    /// | cpu: 0.5
    /// | mem: 128
    /// ```
    pub fn pretty(&self) -> String {
        let mut out = String::new();
        let mut previous: Option<&Key> = None;

        for (key, value) in &self.entries {
            let shared = previous.map_or(0, |prev| key.common_prefix_len(prev));
            let rest = &key.labels()[shared..];

            for (i, label) in rest.iter().enumerate() {
                out.push_str(&"| ".repeat(shared + i));
                out.push_str(label);
                if i + 1 == rest.len() {
                    out.push_str(": ");
                    out.push_str(&value.to_string());
                }
                out.push('\n');
            }
            previous = Some(key);
        }

        out
    }
}

impl fmt::Display for TreeMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pretty())
    }
}

impl<'a> IntoIterator for &'a TreeMap {
    type Item = (&'a Key, &'a Scalar);
    type IntoIter = std::collections::btree_map::Iter<'a, Key, Scalar>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_tree() -> TreeMap {
        TreeMap::from_entries([
            (Key::from(["a", "b", "c"]), Scalar::Int(1)),
            (Key::from(["a", "b", "d"]), Scalar::Int(2)),
            (Key::from(["a", "e"]), Scalar::Int(3)),
            (Key::from(["f"]), Scalar::Int(4)),
        ])
        .unwrap()
    }

    #[test]
    fn test_exact_hit_returns_leaf() {
        let tree = sample_tree();
        for (key, value) in tree.iter() {
            assert_eq!(tree.get(key).unwrap(), Node::Leaf(value.clone()));
        }
    }

    #[test]
    fn test_single_label_lookup() {
        let tree = sample_tree();
        assert_eq!(tree.get("f").unwrap(), Node::Leaf(Scalar::Int(4)));
    }

    #[test]
    fn test_prefix_hit_returns_remainders() {
        let tree = sample_tree();
        let sub = tree.get("a").unwrap().into_tree().unwrap();

        assert_eq!(sub.len(), 3);
        assert_eq!(sub.get_value(["b", "c"]), Some(&Scalar::Int(1)));
        assert_eq!(sub.get_value(["b", "d"]), Some(&Scalar::Int(2)));
        assert_eq!(sub.get_value("e"), Some(&Scalar::Int(3)));

        let deeper = tree.get(["a", "b"]).unwrap().into_tree().unwrap();
        assert_eq!(
            deeper.keys().cloned().collect::<Vec<_>>(),
            vec![Key::from("c"), Key::from("d")]
        );
    }

    #[test]
    fn test_lookup_does_not_mutate() {
        let tree = sample_tree();
        let before = tree.clone();
        let _ = tree.get("a").unwrap();
        let _ = tree.get("zzz");
        assert_eq!(tree, before);
    }

    #[test]
    fn test_missing_key() {
        let tree = sample_tree();
        assert!(matches!(tree.get("x"), Err(TreeDictError::KeyNotFound(_))));
        assert!(matches!(tree.get(["a", "x"]), Err(TreeDictError::KeyNotFound(_))));
        // longer than every stored key
        assert!(matches!(
            tree.get(["a", "b", "c", "d"]),
            Err(TreeDictError::KeyNotFound(_))
        ));
    }

    #[test]
    fn test_partial_label_is_not_a_prefix() {
        let tree = TreeMap::from_entries([(["ab", "c"], 1)]).unwrap();
        assert!(tree.get("a").is_err());
    }

    #[test]
    fn test_empty_key_returns_whole_tree() {
        let tree = sample_tree();
        let all = tree.get(Key::empty()).unwrap().into_tree().unwrap();
        assert_eq!(all, tree);
    }

    #[test]
    fn test_exact_entry_shadows_prefix_in_get() {
        let tree = TreeMap::from_entries([
            (Key::from("x"), Scalar::Int(1)),
            (Key::from(["x", "y"]), Scalar::Int(2)),
        ])
        .unwrap();

        assert_eq!(tree.get("x").unwrap(), Node::Leaf(Scalar::Int(1)));
        let sub = tree.subtree("x").unwrap();
        assert_eq!(sub.len(), 1);
        assert_eq!(sub.get_value("y"), Some(&Scalar::Int(2)));
    }

    #[test]
    fn test_insert_rejects_empty_key() {
        let mut tree = TreeMap::new();
        assert!(matches!(
            tree.insert(Key::empty(), 1),
            Err(TreeDictError::EmptyKey)
        ));
        assert_eq!(tree.insert("a", 1).unwrap(), None);
        assert_eq!(tree.insert("a", 2).unwrap(), Some(Scalar::Int(1)));
    }

    #[test]
    fn test_max_depth_and_prefixes() {
        let tree = sample_tree();
        assert_eq!(tree.max_depth(), 3);
        assert_eq!(tree.prefixes(0), vec![Key::empty()]);
        assert_eq!(tree.prefixes(1), vec![Key::from("a"), Key::from("f")]);
        assert_eq!(
            tree.prefixes(2),
            vec![Key::from(["a", "b"]), Key::from(["a", "e"])]
        );
        assert_eq!(TreeMap::new().max_depth(), 0);
    }

    #[test]
    fn test_from_nested() {
        let value = json!({
            "run1": {"cpu": 0.5, "mem": 128},
            "tags": ["fast", "cold"],
            "name": "bench",
            "empty": {}
        });
        let tree = TreeMap::from_nested(&value).unwrap();

        assert_eq!(tree.len(), 5);
        assert_eq!(tree.get_value(["run1", "cpu"]), Some(&Scalar::Float(0.5)));
        assert_eq!(tree.get_value(["run1", "mem"]), Some(&Scalar::Int(128)));
        assert_eq!(tree.get_value(["tags", "1"]), Some(&Scalar::from("cold")));
        assert_eq!(tree.get_value("name"), Some(&Scalar::from("bench")));
        assert!(!tree.contains_key("empty"));
    }

    #[test]
    fn test_from_nested_rejects_non_object() {
        assert!(matches!(
            TreeMap::from_nested(&json!([1, 2])),
            Err(TreeDictError::InvalidInput(_))
        ));
        assert!(matches!(
            TreeMap::from_json_str("{not json"),
            Err(TreeDictError::Json(_))
        ));
    }

    #[test]
    fn test_pretty() {
        let tree = sample_tree();
        let expected = "\
a
| b
| | c: 1
| | d: 2
| e: 3
f: 4
";
        assert_eq!(tree.pretty(), expected);
        assert_eq!(tree.to_string(), expected);
    }

    #[test]
    fn test_pretty_with_prefix_entry() {
        let tree = TreeMap::from_entries([
            (Key::from("x"), Scalar::Int(1)),
            (Key::from(["x", "y"]), Scalar::Int(2)),
        ])
        .unwrap();
        assert_eq!(tree.pretty(), "x: 1\n| y: 2\n");
    }
}
