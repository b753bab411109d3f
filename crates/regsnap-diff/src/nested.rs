//! Path-level diff: recurse into subtrees present on both sides.

use regsnap_types::{Entry, TreeNode, SEPARATOR};

/// A single difference located by its full path below the compared roots.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NestedChange {
    /// Present only in the second tree.
    Added { path: String, entry: Entry },
    /// Present only in the first tree.
    Removed { path: String, entry: Entry },
    /// A value changed, or an entry switched between value and subkey.
    Modified { path: String, old: Entry, new: Entry },
}

impl NestedChange {
    pub fn path(&self) -> &str {
        match self {
            Self::Added { path, .. } | Self::Removed { path, .. } | Self::Modified { path, .. } => {
                path
            }
        }
    }
}

/// Compare two trees and report every difference at its deepest path.
///
/// Subtrees present on both sides are compared entry by entry instead of
/// as a whole. Changes come out depth-first in `first`'s order, with names
/// only in `second` following at each level.
pub fn diff_nested(first: &TreeNode, second: &TreeNode) -> Vec<NestedChange> {
    let mut changes = Vec::new();
    walk(first, second, "", &mut changes);
    changes
}

fn walk(first: &TreeNode, second: &TreeNode, prefix: &str, changes: &mut Vec<NestedChange>) {
    for (name, old) in first.iter() {
        let path = join(prefix, name);
        match (old, second.get(name)) {
            (_, None) => changes.push(NestedChange::Removed {
                path,
                entry: old.clone(),
            }),
            (Entry::Subtree(old_tree), Some(Entry::Subtree(new_tree))) => {
                walk(old_tree, new_tree, &path, changes);
            }
            (_, Some(new)) if old != new => changes.push(NestedChange::Modified {
                path,
                old: old.clone(),
                new: new.clone(),
            }),
            _ => {}
        }
    }

    for (name, new) in second.iter() {
        if !first.contains(name) {
            changes.push(NestedChange::Added {
                path: join(prefix, name),
                entry: new.clone(),
            });
        }
    }
}

fn join(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}{SEPARATOR}{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regsnap_types::Value;

    #[test]
    fn identical_trees_no_changes() {
        let tree = TreeNode::new().with("a", TreeNode::new().with("b", Value::Dword(1)));
        assert!(diff_nested(&tree, &tree).is_empty());
    }

    #[test]
    fn pinpoints_deep_value_change() {
        let first = TreeNode::new().with(
            "Outer",
            TreeNode::new()
                .with("Same", Value::Dword(0))
                .with("Mid", TreeNode::new().with("Leaf", Value::Dword(1))),
        );
        let second = TreeNode::new().with(
            "Outer",
            TreeNode::new()
                .with("Same", Value::Dword(0))
                .with("Mid", TreeNode::new().with("Leaf", Value::Dword(2))),
        );

        let changes = diff_nested(&first, &second);
        assert_eq!(
            changes,
            vec![NestedChange::Modified {
                path: r"Outer\Mid\Leaf".into(),
                old: Entry::value(1u32),
                new: Entry::value(2u32),
            }]
        );
    }

    #[test]
    fn additions_and_removals_inside_subtrees() {
        let first = TreeNode::new().with("K", TreeNode::new().with("old", Value::from("x")));
        let second = TreeNode::new().with("K", TreeNode::new().with("new", Value::from("y")));

        let changes = diff_nested(&first, &second);
        assert_eq!(changes.len(), 2);
        assert!(matches!(&changes[0], NestedChange::Removed { path, .. } if path == r"K\old"));
        assert!(matches!(&changes[1], NestedChange::Added { path, .. } if path == r"K\new"));
    }

    #[test]
    fn whole_subtree_added_is_one_change() {
        let first = TreeNode::new();
        let second = TreeNode::new().with(
            "New",
            TreeNode::new().with("a", Value::Dword(1)).with("b", Value::Dword(2)),
        );
        let changes = diff_nested(&first, &second);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].path(), "New");
    }

    #[test]
    fn kind_switch_is_modified_at_that_path() {
        let first = TreeNode::new().with("n", Value::Dword(1));
        let second = TreeNode::new().with("n", TreeNode::new().with("x", Value::Dword(1)));
        let changes = diff_nested(&first, &second);
        assert_eq!(changes.len(), 1);
        assert!(matches!(&changes[0], NestedChange::Modified { path, .. } if path == "n"));
    }

    #[test]
    fn agrees_with_top_level_diff_on_emptiness() {
        let first = TreeNode::new().with("a", TreeNode::new().with("b", Value::Dword(1)));
        let second = TreeNode::new().with("a", TreeNode::new().with("b", Value::Dword(2)));
        assert!(!crate::diff(&first, &second).is_empty());
        assert!(!diff_nested(&first, &second).is_empty());
    }
}
