//! Registry values: native type codes and the normalized representation.
//!
//! The store hands back `(kind, bytes)`. [`Value::decode`] turns that into a
//! portable [`Value`]; anything that does not decode cleanly as its declared
//! kind is kept byte-exact as [`Value::Raw`], so no data is lost on the way
//! into a snapshot.

use std::fmt;

/// Store-native value type code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueKind {
    None,
    Sz,
    ExpandSz,
    Binary,
    Dword,
    DwordBigEndian,
    Link,
    MultiSz,
    ResourceList,
    FullResourceDescriptor,
    ResourceRequirementsList,
    Qword,
    /// A code this crate has no name for.
    Other(u32),
}

impl ValueKind {
    /// Map a native type code to a kind.
    pub fn from_code(code: u32) -> Self {
        match code {
            0 => Self::None,
            1 => Self::Sz,
            2 => Self::ExpandSz,
            3 => Self::Binary,
            4 => Self::Dword,
            5 => Self::DwordBigEndian,
            6 => Self::Link,
            7 => Self::MultiSz,
            8 => Self::ResourceList,
            9 => Self::FullResourceDescriptor,
            10 => Self::ResourceRequirementsList,
            11 => Self::Qword,
            other => Self::Other(other),
        }
    }

    /// The native type code.
    pub fn code(&self) -> u32 {
        match self {
            Self::None => 0,
            Self::Sz => 1,
            Self::ExpandSz => 2,
            Self::Binary => 3,
            Self::Dword => 4,
            Self::DwordBigEndian => 5,
            Self::Link => 6,
            Self::MultiSz => 7,
            Self::ResourceList => 8,
            Self::FullResourceDescriptor => 9,
            Self::ResourceRequirementsList => 10,
            Self::Qword => 11,
            Self::Other(code) => *code,
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("REG_NONE"),
            Self::Sz => f.write_str("REG_SZ"),
            Self::ExpandSz => f.write_str("REG_EXPAND_SZ"),
            Self::Binary => f.write_str("REG_BINARY"),
            Self::Dword => f.write_str("REG_DWORD"),
            Self::DwordBigEndian => f.write_str("REG_DWORD_BIG_ENDIAN"),
            Self::Link => f.write_str("REG_LINK"),
            Self::MultiSz => f.write_str("REG_MULTI_SZ"),
            Self::ResourceList => f.write_str("REG_RESOURCE_LIST"),
            Self::FullResourceDescriptor => f.write_str("REG_FULL_RESOURCE_DESCRIPTOR"),
            Self::ResourceRequirementsList => f.write_str("REG_RESOURCE_REQUIREMENTS_LIST"),
            Self::Qword => f.write_str("REG_QWORD"),
            Self::Other(code) => write!(f, "REG_0x{code:x}"),
        }
    }
}

/// A normalized registry value.
///
/// Equality is structural: two values are equal only if they are the same
/// variant with identical payloads. `String("1")` and `ExpandString("1")`
/// differ, as do `Dword(1)` and `Qword(1)`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Value {
    String(String),
    ExpandString(String),
    Dword(u32),
    DwordBigEndian(u32),
    Qword(u64),
    MultiString(Vec<String>),
    Binary(Vec<u8>),
    /// Undecodable or unnamed kinds, kept exactly as the store returned them.
    Raw { kind: ValueKind, data: Vec<u8> },
}

impl Value {
    /// Decode native value bytes of the given kind.
    ///
    /// String kinds are UTF-16LE with trailing NULs stripped. Integer kinds
    /// require their exact width. On any mismatch the bytes are kept as
    /// [`Value::Raw`].
    pub fn decode(kind: ValueKind, data: &[u8]) -> Self {
        let decoded = match kind {
            ValueKind::Sz => decode_utf16(data).map(Self::String),
            ValueKind::ExpandSz => decode_utf16(data).map(Self::ExpandString),
            ValueKind::MultiSz => decode_multi(data).map(Self::MultiString),
            ValueKind::Binary => Some(Self::Binary(data.to_vec())),
            ValueKind::Dword => <[u8; 4]>::try_from(data)
                .ok()
                .map(|b| Self::Dword(u32::from_le_bytes(b))),
            ValueKind::DwordBigEndian => <[u8; 4]>::try_from(data)
                .ok()
                .map(|b| Self::DwordBigEndian(u32::from_be_bytes(b))),
            ValueKind::Qword => <[u8; 8]>::try_from(data)
                .ok()
                .map(|b| Self::Qword(u64::from_le_bytes(b))),
            _ => None,
        };

        decoded.unwrap_or_else(|| Self::Raw {
            kind,
            data: data.to_vec(),
        })
    }

    /// Encode back to native bytes. Strings gain a single NUL terminator.
    pub fn encode(&self) -> Vec<u8> {
        match self {
            Self::String(s) | Self::ExpandString(s) => encode_utf16(s),
            Self::MultiString(items) => {
                let mut out = Vec::new();
                for item in items {
                    out.extend(encode_utf16(item));
                }
                out.extend([0, 0]);
                out
            }
            Self::Dword(v) => v.to_le_bytes().to_vec(),
            Self::DwordBigEndian(v) => v.to_be_bytes().to_vec(),
            Self::Qword(v) => v.to_le_bytes().to_vec(),
            Self::Binary(data) | Self::Raw { data, .. } => data.clone(),
        }
    }

    /// The native kind this value corresponds to.
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::String(_) => ValueKind::Sz,
            Self::ExpandString(_) => ValueKind::ExpandSz,
            Self::Dword(_) => ValueKind::Dword,
            Self::DwordBigEndian(_) => ValueKind::DwordBigEndian,
            Self::Qword(_) => ValueKind::Qword,
            Self::MultiString(_) => ValueKind::MultiSz,
            Self::Binary(_) => ValueKind::Binary,
            Self::Raw { kind, .. } => *kind,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) | Self::ExpandString(s) => write!(f, "{s:?}"),
            Self::Dword(v) | Self::DwordBigEndian(v) => write!(f, "{v} (0x{v:08x})"),
            Self::Qword(v) => write!(f, "{v} (0x{v:016x})"),
            Self::MultiString(items) => write!(f, "{items:?}"),
            Self::Binary(data) | Self::Raw { data, .. } => write!(f, "<{} bytes>", data.len()),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Self::Dword(v)
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Self::Qword(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(data: Vec<u8>) -> Self {
        Self::Binary(data)
    }
}

impl From<&[u8]> for Value {
    fn from(data: &[u8]) -> Self {
        Self::Binary(data.to_vec())
    }
}

fn utf16_units(data: &[u8]) -> Option<Vec<u16>> {
    if data.len() % 2 != 0 {
        return None;
    }
    Some(
        data.chunks_exact(2)
            .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
            .collect(),
    )
}

fn decode_utf16(data: &[u8]) -> Option<String> {
    let mut units = utf16_units(data)?;
    while units.last() == Some(&0) {
        units.pop();
    }
    String::from_utf16(&units).ok()
}

/// Each item carries its own NUL and the list ends with one more. Only those
/// two terminators are stripped, so empty items inside or at the end of the
/// list survive. A missing terminator is tolerated.
fn decode_multi(data: &[u8]) -> Option<Vec<String>> {
    let mut units = utf16_units(data)?;
    if units.last() == Some(&0) {
        units.pop();
    }
    if units.is_empty() {
        return Some(Vec::new());
    }
    if units.last() == Some(&0) {
        units.pop();
    }
    units
        .split(|u| *u == 0)
        .map(String::from_utf16)
        .collect::<Result<Vec<_>, _>>()
        .ok()
}

fn encode_utf16(s: &str) -> Vec<u8> {
    s.encode_utf16()
        .chain(std::iter::once(0))
        .flat_map(u16::to_le_bytes)
        .collect()
}
