//! JSON rendering of diff results.
//!
//! Entries inside a report use the same tagged form as snapshot documents.

use indexmap::IndexMap;
use regsnap_diff::{DiffReport, NestedChange};
use serde::Serialize;

use crate::error::DocumentResult;
use crate::format::{tree_to_repr, EntryRepr, TreeRepr};
use crate::snapshot::to_json;

#[derive(Serialize)]
struct ReportRepr {
    only_in_first: TreeRepr,
    only_in_second: TreeRepr,
    changed: IndexMap<String, ChangeRepr>,
}

#[derive(Serialize)]
struct ChangeRepr {
    old: EntryRepr,
    new: EntryRepr,
}

#[derive(Serialize)]
#[serde(tag = "change", rename_all = "snake_case")]
enum NestedRepr<'a> {
    Added {
        path: &'a str,
        entry: EntryRepr,
    },
    Removed {
        path: &'a str,
        entry: EntryRepr,
    },
    Modified {
        path: &'a str,
        old: EntryRepr,
        new: EntryRepr,
    },
}

/// Encode a top-level diff report.
pub fn encode_report(report: &DiffReport, pretty: bool) -> DocumentResult<String> {
    let repr = ReportRepr {
        only_in_first: tree_to_repr(&report.only_in_first),
        only_in_second: tree_to_repr(&report.only_in_second),
        changed: report
            .changed
            .iter()
            .map(|(name, change)| {
                (
                    name.clone(),
                    ChangeRepr {
                        old: EntryRepr::from(&change.old),
                        new: EntryRepr::from(&change.new),
                    },
                )
            })
            .collect(),
    };
    to_json(&repr, pretty)
}

/// Encode a path-level change list.
pub fn encode_nested_changes(changes: &[NestedChange], pretty: bool) -> DocumentResult<String> {
    let repr: Vec<NestedRepr<'_>> = changes
        .iter()
        .map(|change| match change {
            NestedChange::Added { path, entry } => NestedRepr::Added {
                path: path.as_str(),
                entry: entry.into(),
            },
            NestedChange::Removed { path, entry } => NestedRepr::Removed {
                path: path.as_str(),
                entry: entry.into(),
            },
            NestedChange::Modified { path, old, new } => NestedRepr::Modified {
                path: path.as_str(),
                old: old.into(),
                new: new.into(),
            },
        })
        .collect();
    to_json(&repr, pretty)
}
