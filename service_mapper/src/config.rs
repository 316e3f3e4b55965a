//! Mapper configuration
//!
//! Stored as versioned JSON:
//!
//! ```json
//! { "version": 1, "naming": { "strategy": "service_id_prefix", "separator": "_" } }
//! ```

use crate::NamingStrategy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read mapper configuration from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed mapper configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Unsupported mapper configuration version: {0}")]
    UnsupportedVersion(u32),
}

/// Configuration of an [`OperationMapper`](crate::OperationMapper)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapperConfig {
    /// Version of the configuration format
    pub version: u32,
    /// How registered names are qualified
    pub naming: NamingStrategy,
}

impl MapperConfig {
    pub const CURRENT_VERSION: u32 = 1;

    pub fn new(naming: NamingStrategy) -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            naming,
        }
    }

    /// Parses a configuration from JSON bytes
    pub fn from_json(bytes: &[u8]) -> Result<Self, ConfigError> {
        let config: MapperConfig = serde_json::from_slice(bytes)?;
        if config.version != Self::CURRENT_VERSION {
            return Err(ConfigError::UnsupportedVersion(config.version));
        }
        Ok(config)
    }

    /// Loads a configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&bytes)
    }

    /// Serializes the configuration as pretty JSON
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self::new(NamingStrategy::default())
    }
}
