//! Tuple keys for tree dictionaries.
//!
//! A [`Key`] is an ordered sequence of labels. Its length is the depth of the
//! entry in the conceptual tree: `("run1", "cpu", "mean")` sits three levels
//! down. Keys compare element by element, and a key sorts before every longer
//! key it is a prefix of, so a sorted key list reads like a depth-first walk.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An ordered tuple of labels.
#[derive(
    Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Key(Vec<String>);

impl Key {
    /// Create a key from its labels.
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Key(labels.into_iter().map(Into::into).collect())
    }

    /// The zero-length key. Valid as a lookup prefix, matches every entry.
    pub fn empty() -> Self {
        Key(Vec::new())
    }

    /// Number of labels (depth).
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The labels in order.
    pub fn labels(&self) -> &[String] {
        &self.0
    }

    /// Check whether `prefix` matches the first `prefix.len()` labels.
    pub fn starts_with(&self, prefix: &Key) -> bool {
        self.0.starts_with(&prefix.0)
    }

    /// Remove `prefix` from the front, returning the remainder.
    ///
    /// Returns `None` if this key does not start with `prefix`.
    pub fn strip_prefix(&self, prefix: &Key) -> Option<Key> {
        self.0
            .strip_prefix(prefix.0.as_slice())
            .map(|rest| Key(rest.to_vec()))
    }

    /// The first `len` labels (the whole key if it is shorter).
    pub fn prefix(&self, len: usize) -> Key {
        Key(self.0[..len.min(self.0.len())].to_vec())
    }

    /// Return a new key with `label` appended.
    pub fn child(&self, label: impl Into<String>) -> Key {
        let mut labels = self.0.clone();
        labels.push(label.into());
        Key(labels)
    }

    /// Join the labels with `separator`.
    pub fn join(&self, separator: &str) -> String {
        self.0.join(separator)
    }

    /// Number of leading labels shared with `other`.
    pub fn common_prefix_len(&self, other: &Key) -> usize {
        self.0
            .iter()
            .zip(other.0.iter())
            .take_while(|(a, b)| a == b)
            .count()
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join(", "))
    }
}

impl From<&str> for Key {
    fn from(label: &str) -> Self {
        Key(vec![label.to_string()])
    }
}

impl From<String> for Key {
    fn from(label: String) -> Self {
        Key(vec![label])
    }
}

impl From<&String> for Key {
    fn from(label: &String) -> Self {
        Key(vec![label.clone()])
    }
}

impl From<Vec<String>> for Key {
    fn from(labels: Vec<String>) -> Self {
        Key(labels)
    }
}

impl From<&[&str]> for Key {
    fn from(labels: &[&str]) -> Self {
        Key::new(labels.iter().copied())
    }
}

impl<const N: usize> From<[&str; N]> for Key {
    fn from(labels: [&str; N]) -> Self {
        Key::new(labels)
    }
}

impl From<&Key> for Key {
    fn from(key: &Key) -> Self {
        key.clone()
    }
}
