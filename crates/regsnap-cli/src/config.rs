use std::path::Path;

use anyhow::Context;
use regsnap_reader::ReaderConfig;
use serde::{Deserialize, Serialize};

/// Settings loaded from `--config`. Every field is optional in the file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub reader: ReaderConfig,
    /// Indent JSON output.
    pub pretty: bool,
    /// Colour text output.
    pub color: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            reader: ReaderConfig::default(),
            pretty: true,
            color: true,
        }
    }
}

impl CliConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("invalid config {}", path.display()))
    }

    /// Reader settings with command-line overrides applied.
    pub fn reader_with(&self, max_depth: Option<usize>, skip_inaccessible: bool) -> ReaderConfig {
        let mut reader = self.reader.clone();
        if let Some(depth) = max_depth {
            reader.max_depth = depth;
        }
        reader.skip_inaccessible |= skip_inaccessible;
        reader
    }
}
