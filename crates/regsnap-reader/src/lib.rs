//! Tree reader for regsnap.
//!
//! Walks a registry key depth-first and assembles a [`TreeNode`] holding
//! every value and subkey beneath it. The walk is read-only and holds one
//! open key per level of nesting; each handle is released before its parent
//! moves on to the next sibling.
//!
//! # Key Types
//!
//! - [`TreeReader`] -- Reader bound to a [`KeyStore`](regsnap_store::KeyStore)
//! - [`ReaderConfig`] -- Depth limit and inaccessible-key policy
//! - [`ReadError`] -- `InvalidPath`, `StoreAccess`, `DepthExceeded`
//!
//! [`TreeNode`]: regsnap_types::TreeNode

pub mod config;
pub mod error;
pub mod reader;

pub use config::{ReaderConfig, DEFAULT_MAX_DEPTH};
pub use error::{ReadError, ReadResult};
pub use reader::{read_tree, TreeReader};
