//! Top-level tree diff: compare two trees name by name.
//!
//! Content equality is deep. Two subtrees are equal only if every name below
//! them maps to an equal entry, but a difference found anywhere inside a
//! subtree is surfaced as a change of the subtree's own top-level name.

use regsnap_types::TreeNode;

use crate::report::{DiffReport, ValueChange};

/// Compare two trees.
///
/// - Names only in `first` land in `only_in_first`.
/// - Names only in `second` land in `only_in_second`.
/// - Names in both with unequal entries land in `changed` with both sides.
///
/// Neither input is modified.
pub fn diff(first: &TreeNode, second: &TreeNode) -> DiffReport {
    let mut report = DiffReport::new();

    // Removed and changed entries.
    for (name, old) in first.iter() {
        match second.get(name) {
            Some(new) => {
                if old != new {
                    report.changed.insert(
                        name.to_string(),
                        ValueChange {
                            old: old.clone(),
                            new: new.clone(),
                        },
                    );
                }
            }
            None => {
                report.only_in_first.insert(name, old.clone());
            }
        }
    }

    // Added entries.
    for (name, new) in second.iter() {
        if !first.contains(name) {
            report.only_in_second.insert(name, new.clone());
        }
    }

    report
}
