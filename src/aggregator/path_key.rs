//! Path keys: the ordered label sequence that identifies a call path.
//!
//! A key is built from the region stack bottom to top, so `foo` calling
//! `bar` produces `["foo", "bar"]`. Recursion produces longer keys
//! (`foo`, `foo > foo`, ...) which keeps a region and its same-named
//! parent in separate statistics buckets.

use crate::utils::config::PATH_SEPARATOR;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordered, immutable sequence of region labels
///
/// Equality, ordering and hashing are by the full label sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PathKey(Vec<String>);

impl PathKey {
    /// Build a key from labels given bottom (outermost) first
    pub fn from_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(labels.into_iter().map(Into::into).collect())
    }

    /// Labels, outermost first
    pub fn labels(&self) -> &[String] {
        &self.0
    }

    /// Number of labels (nesting depth of the innermost region)
    pub fn depth(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Innermost label
    pub fn leaf(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    /// Key of the enclosing region, `None` for a top-level key
    pub fn parent(&self) -> Option<PathKey> {
        match self.0.split_last() {
            Some((_, rest)) if !rest.is_empty() => Some(Self(rest.to_vec())),
            _ => None,
        }
    }

    /// Key of the outermost region on this path
    pub fn root(&self) -> Option<PathKey> {
        self.0.first().map(|label| Self(vec![label.clone()]))
    }

    /// Key of a region entered beneath this one
    pub fn child(&self, label: impl Into<String>) -> PathKey {
        let mut labels = self.0.clone();
        labels.push(label.into());
        Self(labels)
    }
}

impl fmt::Display for PathKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join(PATH_SEPARATOR))
    }
}

impl<S: Into<String>> FromIterator<S> for PathKey {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::from_labels(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_equality_is_by_label_sequence() {
        let a = PathKey::from_labels(["foo", "bar"]);
        let b: PathKey = vec!["foo".to_string(), "bar".to_string()].into_iter().collect();
        assert_eq!(a, b);

        let mut set = HashSet::new();
        set.insert(a);
        assert!(set.contains(&b));
    }

    #[test]
    fn test_recursive_keys_are_distinct() {
        let one = PathKey::from_labels(["foo"]);
        let two = one.child("foo");
        let three = two.child("foo");

        assert_ne!(one, two);
        assert_ne!(two, three);
        assert_eq!(three.depth(), 3);
        assert_eq!(three.parent(), Some(two.clone()));
        assert_eq!(two.parent(), Some(one.clone()));
        assert_eq!(one.parent(), None);
    }

    #[test]
    fn test_display_and_root() {
        let key = PathKey::from_labels(["main", "load", "parse"]);
        assert_eq!(key.to_string(), "main > load > parse");
        assert_eq!(key.root(), Some(PathKey::from_labels(["main"])));
        assert_eq!(key.leaf(), Some("parse"));
    }

    #[test]
    fn test_ordering_puts_parent_before_child() {
        let mut keys = vec![
            PathKey::from_labels(["foo", "bar"]),
            PathKey::from_labels(["baz"]),
            PathKey::from_labels(["foo"]),
        ];
        keys.sort();
        assert_eq!(keys[0].to_string(), "baz");
        assert_eq!(keys[1].to_string(), "foo");
        assert_eq!(keys[2].to_string(), "foo > bar");
    }
}
