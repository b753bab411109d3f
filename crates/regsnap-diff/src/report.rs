use indexmap::IndexMap;
use regsnap_types::{Entry, TreeNode};

/// Both sides of an entry whose content differs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValueChange {
    pub old: Entry,
    pub new: Entry,
}

/// The result of comparing two snapshot trees at the top level.
///
/// Each section is keyed by entry name. Sections follow the iteration order
/// of the inputs, but consumers should treat them as unordered.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DiffReport {
    /// Entries present only in the first tree.
    pub only_in_first: TreeNode,
    /// Entries present only in the second tree.
    pub only_in_second: TreeNode,
    /// Entries present in both trees with unequal content.
    pub changed: IndexMap<String, ValueChange>,
}

impl DiffReport {
    /// Create an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the trees were equal.
    pub fn is_empty(&self) -> bool {
        self.only_in_first.is_empty() && self.only_in_second.is_empty() && self.changed.is_empty()
    }

    /// Total number of reported entries.
    pub fn len(&self) -> usize {
        self.only_in_first.len() + self.only_in_second.len() + self.changed.len()
    }

    /// Number of entries only in the first tree.
    pub fn removals(&self) -> usize {
        self.only_in_first.len()
    }

    /// Number of entries only in the second tree.
    pub fn additions(&self) -> usize {
        self.only_in_second.len()
    }

    /// Number of entries that changed.
    pub fn modifications(&self) -> usize {
        self.changed.len()
    }
}
