//! Diff engine for regsnap.
//!
//! Compares two snapshot trees by entry name. Two views are offered:
//!
//! - [`diff`] -- top-level report. Entries present on one side only, and
//!   entries present on both sides with unequal content. A subtree that
//!   differs anywhere below is reported once, as a whole, under its own name.
//! - [`diff_nested`] -- walks into subtrees present on both sides and reports
//!   each difference at its full backslash-joined path.
//!
//! # Key Types
//!
//! - [`DiffReport`] / [`ValueChange`] -- Top-level report
//! - [`NestedChange`] -- Path-level change

pub mod nested;
pub mod report;
pub mod tree_diff;

pub use nested::{diff_nested, NestedChange};
pub use report::{DiffReport, ValueChange};
pub use tree_diff::diff;
