//! Foundation types for regsnap.
//!
//! This crate provides the data model shared by every other regsnap crate:
//! where a snapshot was taken from, what a registry value looks like once it
//! has been normalized, and the tree document a read pass produces.
//!
//! # Key Types
//!
//! - [`Hive`] / [`RegistryPath`] -- A parsed `HIVE\subpath` root
//! - [`ValueKind`] -- Store-native value type code (`REG_SZ`, `REG_DWORD`, ...)
//! - [`Value`] -- A normalized, portable registry value
//! - [`Entry`] / [`TreeNode`] -- The snapshot tree: values and subkeys by name

pub mod error;
pub mod path;
pub mod tree;
pub mod value;

pub use error::{TypeError, TypeResult};
pub use path::{Hive, RegistryPath, SEPARATOR};
pub use tree::{Entry, TreeNode, TreeStats};
pub use value::{Value, ValueKind};
