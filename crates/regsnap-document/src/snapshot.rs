//! Snapshot documents: envelope, text encoding, and files.

use std::path::Path;

use chrono::{DateTime, Utc};
use regsnap_types::{RegistryPath, TreeNode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{DocumentError, DocumentResult};
use crate::format::{tree_from_repr, tree_to_repr, TreeRepr};

/// Format tag written into every envelope.
pub const FORMAT: &str = "regsnap/1";

/// A snapshot tree plus where and when it was taken.
///
/// `root` and `captured_at` are absent for documents that were saved as a
/// bare tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snapshot {
    pub root: Option<String>,
    pub captured_at: Option<DateTime<Utc>>,
    pub tree: TreeNode,
}

impl Snapshot {
    /// A snapshot of `root` taken now.
    pub fn new(root: &RegistryPath, tree: TreeNode) -> Self {
        Self {
            root: Some(root.to_string()),
            captured_at: Some(Utc::now()),
            tree,
        }
    }

    /// A snapshot with no provenance.
    pub fn from_tree(tree: TreeNode) -> Self {
        Self {
            root: None,
            captured_at: None,
            tree,
        }
    }
}

#[derive(Serialize, Deserialize)]
struct Envelope {
    format: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    root: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    captured_at: Option<DateTime<Utc>>,
    tree: TreeRepr,
}

/// Encode a snapshot with its envelope.
pub fn encode_document(snapshot: &Snapshot, pretty: bool) -> DocumentResult<String> {
    let envelope = Envelope {
        format: FORMAT.to_string(),
        root: snapshot.root.clone(),
        captured_at: snapshot.captured_at,
        tree: tree_to_repr(&snapshot.tree),
    };
    to_json(&envelope, pretty)
}

#[derive(Deserialize)]
struct FormatProbe {
    format: Option<serde_json::Value>,
}

/// Decode a document, with or without an envelope.
///
/// Nesting depth is unbounded; the stack grows as needed.
pub fn decode_document(text: &str) -> DocumentResult<Snapshot> {
    // In a bare tree every member is an entry object, so a string-valued
    // `format` member can only come from an envelope.
    let probe: FormatProbe = from_json(text)?;
    let format = probe.format.as_ref().and_then(serde_json::Value::as_str);

    match format {
        Some(FORMAT) => {
            let envelope: Envelope = from_json(text)?;
            Ok(Snapshot {
                root: envelope.root,
                captured_at: envelope.captured_at,
                tree: tree_from_repr(envelope.tree),
            })
        }
        Some(other) => Err(DocumentError::Deserialization(format!(
            "unsupported document format {other:?} (expected {FORMAT:?})"
        ))),
        None => {
            let repr: TreeRepr = from_json(text)?;
            Ok(Snapshot::from_tree(tree_from_repr(repr)))
        }
    }
}

/// Encode just the tree, with no envelope.
pub fn encode_tree(tree: &TreeNode) -> DocumentResult<String> {
    to_json(&tree_to_repr(tree), false)
}

/// Decode a tree from a document, with or without an envelope.
pub fn decode_tree(text: &str) -> DocumentResult<TreeNode> {
    decode_document(text).map(|snapshot| snapshot.tree)
}

/// Write a snapshot document to `path`, replacing any existing file.
pub fn save_snapshot(path: &Path, snapshot: &Snapshot) -> DocumentResult<()> {
    let text = encode_document(snapshot, true)?;
    std::fs::write(path, text).map_err(|source| DocumentError::Io {
        action: "failed to write",
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(path = %path.display(), "snapshot saved");
    Ok(())
}

/// Read a snapshot document from `path`.
pub fn load_snapshot(path: &Path) -> DocumentResult<Snapshot> {
    let text = std::fs::read_to_string(path).map_err(|source| DocumentError::Io {
        action: "failed to read",
        path: path.to_path_buf(),
        source,
    })?;
    let snapshot = decode_document(&text)?;
    tracing::debug!(path = %path.display(), entries = snapshot.tree.len(), "snapshot loaded");
    Ok(snapshot)
}

fn from_json<T: DeserializeOwned>(text: &str) -> DocumentResult<T> {
    let mut de = serde_json::Deserializer::from_str(text);
    de.disable_recursion_limit();
    T::deserialize(serde_stacker::Deserializer::new(&mut de))
        .and_then(|value| de.end().map(|()| value))
        .map_err(|e| DocumentError::Deserialization(e.to_string()))
}

pub(crate) fn to_json<T: Serialize>(value: &T, pretty: bool) -> DocumentResult<String> {
    let result = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    result.map_err(|e| DocumentError::Serialization(e.to_string()))
}
