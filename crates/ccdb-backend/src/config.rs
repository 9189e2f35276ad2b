use std::path::Path;

use ccdb_codec::{CompressionCodec, CompressionConfig};
use serde::{Deserialize, Serialize};

use crate::error::{BackendError, BackendResult};

pub const DEFAULT_STORE: &str = "Riak";

/// Construction-time configuration of a [`Backend`](crate::Backend).
///
/// Envelopes do not record the compression algorithm, so both ends of a
/// store must agree on `compression.algorithm`. A message compressed with a
/// different algorithm fails to unpack with a decompression error.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BackendConfig {
    /// Identifier of the destination key-value store written into every
    /// outbound envelope.
    pub store: String,
    pub compression: CompressionConfig,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            store: DEFAULT_STORE.into(),
            compression: CompressionConfig::default(),
        }
    }
}

impl BackendConfig {
    pub fn with_store(mut self, store: impl Into<String>) -> Self {
        self.store = store.into();
        self
    }

    pub fn with_compression(mut self, compression: CompressionConfig) -> Self {
        self.compression = compression;
        self
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(s: &str) -> BackendResult<Self> {
        let config: Self = toml::from_str(s).map_err(|e| BackendError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file.
    pub fn load(path: &Path) -> BackendResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> BackendResult<()> {
        if self.store.trim().is_empty() {
            return Err(BackendError::Config("store identifier must not be empty".into()));
        }
        CompressionCodec::new(self.compression.clone())
            .validate()
            .map_err(|e| BackendError::Config(e.to_string()))
    }
}
