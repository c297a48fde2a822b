use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::ConfigError;

/// How the output palette is populated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PaletteStrategy {
    /// One placeholder per identifier in the full source range, used or not.
    #[default]
    FullRange,
    /// Only identifiers that occur in the grid, in ascending order.
    Compact,
}

/// Converter settings. Every field has a default, so a RON file only needs
/// the fields it overrides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertConfig {
    /// Namespace prefix of placeholder block names.
    pub namespace: String,
    /// Value of the document's `author` field.
    pub author: String,
    /// Value of the document's `DataVersion` field.
    pub data_version: i32,
    /// Palette population strategy.
    pub palette: PaletteStrategy,
    /// Gzip level (0-9) for written documents.
    pub compression_level: u32,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            author: DEFAULT_AUTHOR.to_string(),
            data_version: STRUCTURE_DATA_VERSION,
            palette: PaletteStrategy::default(),
            compression_level: DEFAULT_COMPRESSION_LEVEL,
        }
    }
}

impl ConvertConfig {
    /// Parse a config from a RON string.
    pub fn from_ron_str(ron_str: &str) -> Result<Self, ConfigError> {
        let options = ron::Options::default();
        options
            .from_str(ron_str)
            .map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Read and parse a RON config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ron_str(&contents)
    }

    /// Compression level clamped to what the encoder accepts.
    pub fn effective_compression_level(&self) -> u32 {
        self.compression_level.min(MAX_COMPRESSION_LEVEL)
    }
}
