//! Registry access for regsnap.
//!
//! This crate is the boundary between regsnap and the hierarchical store it
//! snapshots. The store is consumed through two small traits: a
//! [`KeyStore`] opens keys, and an [`OpenKey`] enumerates one key's values
//! and subkey names by index until the store reports exhaustion.
//!
//! # Backends
//!
//! All backends implement the [`KeyStore`] trait:
//!
//! - [`InMemoryKeyStore`] -- map-based store for tests and embedding, with
//!   fault injection and handle accounting
//! - `WindowsRegistry` -- the live registry (Windows only)
//!
//! # Design Rules
//!
//! 1. The store is read-only from regsnap's point of view.
//! 2. An open key is released when its handle is dropped, on every path.
//! 3. "No more items" is the only enumeration outcome that ends a sequence
//!    quietly. Every other fault surfaces as an error item.

pub mod error;
pub mod memory;
pub mod traits;
#[cfg(windows)]
pub mod windows;

pub use error::{StoreError, StoreResult};
pub use memory::InMemoryKeyStore;
pub use traits::{Enumeration, KeyStore, OpenKey, RawValue};
#[cfg(windows)]
pub use windows::WindowsRegistry;
