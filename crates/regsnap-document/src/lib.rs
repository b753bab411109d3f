//! Persisted document format for regsnap.
//!
//! Snapshots are stored as JSON. Every entry is a tagged object so the
//! document can be decoded back into exactly the tree that was encoded:
//!
//! ```json
//! {
//!   "format": "regsnap/1",
//!   "root": "HKEY_CURRENT_USER\\Software\\Vendor",
//!   "captured_at": "2024-05-01T12:00:00Z",
//!   "tree": {
//!     "Ver": { "type": "sz", "data": "1.0" },
//!     "Sub": { "type": "key", "entries": {
//!       "X": { "type": "binary", "data": "AQI=" }
//!     } }
//!   }
//! }
//! ```
//!
//! Binary payloads are standard base64 under their own `binary` / `raw`
//! tags, never plain strings. A bare tree object (no envelope) is also
//! accepted on load.

pub mod error;
pub mod format;
pub mod report;
pub mod snapshot;

pub use error::{DocumentError, DocumentResult};
pub use report::{encode_nested_changes, encode_report};
pub use snapshot::{
    decode_document, decode_tree, encode_document, encode_tree, load_snapshot, save_snapshot,
    Snapshot, FORMAT,
};
