use serde::{Deserialize, Serialize};

/// The native registry refuses to nest keys deeper than this.
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// Tuning for a read pass.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderConfig {
    /// Deepest subkey nesting accepted below the root.
    pub max_depth: usize,
    /// Omit subkeys that refuse to open with "access denied" instead of
    /// failing the whole read. Never applies to the root key.
    pub skip_inaccessible: bool,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            skip_inaccessible: false,
        }
    }
}
