//! On-disk representation of tree entries.
//!
//! Each entry is a JSON object tagged by `type`:
//!
//! | `type`             | payload                              |
//! |--------------------|--------------------------------------|
//! | `key`              | `entries`: nested object of entries  |
//! | `sz`, `expand_sz`  | `data`: string                       |
//! | `dword`, `dword_big_endian`, `qword` | `data`: number     |
//! | `multi_sz`         | `data`: array of strings             |
//! | `binary`           | `data`: base64 string                |
//! | `raw`              | `kind`: native code, `data`: base64  |

use indexmap::IndexMap;
use regsnap_types::{Entry, TreeNode, Value, ValueKind};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// A tree as stored: entry name to tagged entry, in document order.
pub type TreeRepr = IndexMap<String, EntryRepr>;

/// A single tagged entry.
///
/// Only serialization uses serde's internal tagging. Decoding reads an
/// `EntryFields` and checks the members `type` requires.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    rename_all = "snake_case",
    try_from = "EntryFields"
)]
pub enum EntryRepr {
    Key {
        entries: TreeRepr,
    },
    Sz {
        data: String,
    },
    ExpandSz {
        data: String,
    },
    Dword {
        data: u32,
    },
    DwordBigEndian {
        data: u32,
    },
    Qword {
        data: u64,
    },
    MultiSz {
        data: Vec<String>,
    },
    Binary {
        #[serde(serialize_with = "base64_bytes::serialize")]
        data: Vec<u8>,
    },
    Raw {
        kind: u32,
        #[serde(serialize_with = "base64_bytes::serialize")]
        data: Vec<u8>,
    },
}

#[derive(Deserialize)]
#[serde(rename_all = "snake_case")]
enum EntryTag {
    Key,
    Sz,
    ExpandSz,
    Dword,
    DwordBigEndian,
    Qword,
    MultiSz,
    Binary,
    Raw,
}

/// Every member an entry object may carry; which ones are required depends
/// on `type`.
#[derive(Deserialize)]
struct EntryFields {
    #[serde(rename = "type")]
    tag: EntryTag,
    kind: Option<u32>,
    data: Option<serde_json::Value>,
    entries: Option<TreeRepr>,
}

impl TryFrom<EntryFields> for EntryRepr {
    type Error = String;

    fn try_from(fields: EntryFields) -> Result<Self, Self::Error> {
        let EntryFields {
            tag,
            kind,
            data,
            entries,
        } = fields;

        let repr = match tag {
            EntryTag::Key => Self::Key {
                entries: entries.ok_or("missing field `entries`")?,
            },
            EntryTag::Sz => Self::Sz {
                data: payload(data)?,
            },
            EntryTag::ExpandSz => Self::ExpandSz {
                data: payload(data)?,
            },
            EntryTag::Dword => Self::Dword {
                data: payload(data)?,
            },
            EntryTag::DwordBigEndian => Self::DwordBigEndian {
                data: payload(data)?,
            },
            EntryTag::Qword => Self::Qword {
                data: payload(data)?,
            },
            EntryTag::MultiSz => Self::MultiSz {
                data: payload(data)?,
            },
            EntryTag::Binary => Self::Binary {
                data: base64_bytes::decode(&payload::<String>(data)?)?,
            },
            EntryTag::Raw => Self::Raw {
                kind: kind.ok_or("missing field `kind`")?,
                data: base64_bytes::decode(&payload::<String>(data)?)?,
            },
        };
        Ok(repr)
    }
}

fn payload<T: DeserializeOwned>(data: Option<serde_json::Value>) -> Result<T, String> {
    let data = data.ok_or("missing field `data`")?;
    serde_json::from_value(data).map_err(|e| format!("invalid `data`: {e}"))
}

impl From<&Value> for EntryRepr {
    fn from(value: &Value) -> Self {
        match value {
            Value::String(s) => Self::Sz { data: s.clone() },
            Value::ExpandString(s) => Self::ExpandSz { data: s.clone() },
            Value::Dword(v) => Self::Dword { data: *v },
            Value::DwordBigEndian(v) => Self::DwordBigEndian { data: *v },
            Value::Qword(v) => Self::Qword { data: *v },
            Value::MultiString(items) => Self::MultiSz {
                data: items.clone(),
            },
            Value::Binary(data) => Self::Binary { data: data.clone() },
            Value::Raw { kind, data } => Self::Raw {
                kind: kind.code(),
                data: data.clone(),
            },
        }
    }
}

impl From<&Entry> for EntryRepr {
    fn from(entry: &Entry) -> Self {
        match entry {
            Entry::Value(value) => value.into(),
            Entry::Subtree(node) => Self::Key {
                entries: tree_to_repr(node),
            },
        }
    }
}

impl From<EntryRepr> for Entry {
    fn from(repr: EntryRepr) -> Self {
        match repr {
            EntryRepr::Key { entries } => Entry::Subtree(tree_from_repr(entries)),
            EntryRepr::Sz { data } => Entry::Value(Value::String(data)),
            EntryRepr::ExpandSz { data } => Entry::Value(Value::ExpandString(data)),
            EntryRepr::Dword { data } => Entry::Value(Value::Dword(data)),
            EntryRepr::DwordBigEndian { data } => Entry::Value(Value::DwordBigEndian(data)),
            EntryRepr::Qword { data } => Entry::Value(Value::Qword(data)),
            EntryRepr::MultiSz { data } => Entry::Value(Value::MultiString(data)),
            EntryRepr::Binary { data } => Entry::Value(Value::Binary(data)),
            EntryRepr::Raw { kind, data } => Entry::Value(Value::Raw {
                kind: ValueKind::from_code(kind),
                data,
            }),
        }
    }
}

pub fn tree_to_repr(node: &TreeNode) -> TreeRepr {
    node.iter()
        .map(|(name, entry)| (name.to_string(), EntryRepr::from(entry)))
        .collect()
}

pub fn tree_from_repr(repr: TreeRepr) -> TreeNode {
    repr.into_iter()
        .map(|(name, entry)| (name, Entry::from(entry)))
        .collect()
}

mod base64_bytes {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine as _;
    use serde::Serializer;

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn decode(encoded: &str) -> Result<Vec<u8>, String> {
        STANDARD
            .decode(encoded.as_bytes())
            .map_err(|e| format!("invalid base64: {e}"))
    }
}
