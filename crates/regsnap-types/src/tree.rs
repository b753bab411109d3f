//! The snapshot tree.
//!
//! A [`TreeNode`] maps names to [`Entry`] values. Value names and subkey
//! names share one namespace per node. Insertion order is kept so a snapshot
//! lists entries the way the store enumerated them, but equality compares by
//! name only.

use indexmap::IndexMap;

use crate::value::Value;

/// One named item under a key: a leaf value or a nested key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Entry {
    Value(Value),
    Subtree(TreeNode),
}

impl Entry {
    pub fn value(value: impl Into<Value>) -> Self {
        Self::Value(value.into())
    }

    pub fn subtree(node: TreeNode) -> Self {
        Self::Subtree(node)
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Self::Value(v) => Some(v),
            Self::Subtree(_) => None,
        }
    }

    pub fn as_subtree(&self) -> Option<&TreeNode> {
        match self {
            Self::Subtree(t) => Some(t),
            Self::Value(_) => None,
        }
    }

    pub fn is_subtree(&self) -> bool {
        matches!(self, Self::Subtree(_))
    }
}

impl From<Value> for Entry {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

impl From<TreeNode> for Entry {
    fn from(node: TreeNode) -> Self {
        Self::Subtree(node)
    }
}

/// A key's contents: its values and subkeys, by name.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TreeNode {
    entries: IndexMap<String, Entry>,
}

impl TreeNode {
    /// Create an empty node.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry, replacing any existing entry with the same name.
    ///
    /// A replaced entry keeps its original position. The previous entry is
    /// returned so callers can report collisions.
    pub fn insert(&mut self, name: impl Into<String>, entry: impl Into<Entry>) -> Option<Entry> {
        self.entries.insert(name.into(), entry.into())
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, entry: impl Into<Entry>) -> Self {
        self.insert(name, entry);
        self
    }

    /// Remove an entry, keeping the order of the rest.
    pub fn remove(&mut self, name: &str) -> Option<Entry> {
        self.entries.shift_remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&Entry> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Number of direct entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the node has no values and no subkeys.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Entry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Entry names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Count keys, values and depth across the whole tree.
    pub fn stats(&self) -> TreeStats {
        let mut stats = TreeStats::default();
        for (_, entry) in self.iter() {
            match entry {
                Entry::Value(_) => stats.values += 1,
                Entry::Subtree(child) => {
                    let inner = child.stats();
                    stats.keys += 1 + inner.keys;
                    stats.values += inner.values;
                    stats.depth = stats.depth.max(inner.depth + 1);
                }
            }
        }
        stats
    }
}

impl<K: Into<String>, E: Into<Entry>> FromIterator<(K, E)> for TreeNode {
    fn from_iter<I: IntoIterator<Item = (K, E)>>(iter: I) -> Self {
        let mut node = Self::new();
        for (name, entry) in iter {
            node.insert(name, entry);
        }
        node
    }
}

impl IntoIterator for TreeNode {
    type Item = (String, Entry);
    type IntoIter = indexmap::map::IntoIter<String, Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Aggregate counts over a tree.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TreeStats {
    /// Subkeys below the root (the root itself is not counted).
    pub keys: usize,
    /// Values at every level.
    pub values: usize,
    /// Longest chain of nested subkeys.
    pub depth: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TreeNode {
        TreeNode::new()
            .with("Ver", Value::from("1.0"))
            .with(
                "Sub",
                TreeNode::new()
                    .with("X", Value::Binary(vec![1, 2]))
                    .with("Deeper", TreeNode::new().with("Y", Value::Dword(3))),
            )
    }

    #[test]
    fn remove_keeps_remaining_order() {
        let mut node = TreeNode::new()
            .with("a", Value::Dword(1))
            .with("b", Value::Dword(2))
            .with("c", Value::Dword(3));
        assert_eq!(node.remove("b"), Some(Entry::value(2u32)));
        assert_eq!(node.remove("b"), None);
        assert_eq!(node.names().collect::<Vec<_>>(), vec!["a", "c"]);
    }

    #[test]
    fn empty_node() {
        let node = TreeNode::new();
        assert!(node.is_empty());
        assert_eq!(node.stats(), TreeStats::default());
    }

    #[test]
    fn insert_and_get() {
        let node = sample();
        assert_eq!(node.len(), 2);
        assert_eq!(node.get("Ver").and_then(Entry::as_value), Some(&Value::from("1.0")));
        assert!(node.get("Sub").is_some_and(Entry::is_subtree));
        assert!(node.get("missing").is_none());
    }

    #[test]
    fn later_entry_overwrites_earlier_in_place() {
        let mut node = TreeNode::new().with("A", Value::Dword(1)).with("B", Value::Dword(2));
        let previous = node.insert("A", TreeNode::new());
        assert_eq!(previous, Some(Entry::value(1u32)));
        assert!(node.get("A").is_some_and(Entry::is_subtree));
        assert_eq!(node.names().collect::<Vec<_>>(), vec!["A", "B"]);
    }

    #[test]
    fn iteration_follows_insertion_order() {
        let node = TreeNode::new()
            .with("z", Value::Dword(1))
            .with("a", Value::Dword(2))
            .with("m", Value::Dword(3));
        assert_eq!(node.names().collect::<Vec<_>>(), vec!["z", "a", "m"]);
    }

    #[test]
    fn equality_ignores_order() {
        let a = TreeNode::new().with("x", Value::Dword(1)).with("y", Value::Dword(2));
        let b = TreeNode::new().with("y", Value::Dword(2)).with("x", Value::Dword(1));
        assert_eq!(a, b);
    }

    #[test]
    fn equality_is_deep() {
        let a = sample();
        let mut b = sample();
        b.insert(
            "Sub",
            TreeNode::new()
                .with("X", Value::Binary(vec![1, 2]))
                .with("Deeper", TreeNode::new().with("Y", Value::Dword(4))),
        );
        assert_ne!(a, b);
    }

    #[test]
    fn stats_count_whole_tree() {
        let stats = sample().stats();
        assert_eq!(stats.keys, 2);
        assert_eq!(stats.values, 3);
        assert_eq!(stats.depth, 2);
    }

    #[test]
    fn collect_from_pairs() {
        let node: TreeNode = vec![("a", Value::Dword(1)), ("b", Value::Dword(2))]
            .into_iter()
            .collect();
        assert_eq!(node.len(), 2);
    }
}
