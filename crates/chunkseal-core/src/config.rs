use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::{ChunkSealError, ChunkSealResult};

/// Top-level configuration (loaded from chunkseal.toml)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkSealConfig {
    pub cipher: CipherConfig,
    pub log: LogConfig,
}

/// Frame sizes and key source
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CipherConfig {
    /// Salt length in bytes (0 = default 32)
    pub salt_size: usize,
    /// Nonce length in bytes (0 = default 24)
    pub nonce_size: usize,
    /// Required key material length in bytes (0 = default 32)
    pub key_size: usize,
    /// File holding raw key material
    pub key_file: Option<PathBuf>,
    /// Environment variable holding a passphrase
    pub key_env: String,
}

impl Default for CipherConfig {
    fn default() -> Self {
        Self {
            salt_size: 32,
            nonce_size: 24,
            key_size: 32,
            key_file: None,
            key_env: "CHUNKSEAL_KEY".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Log level (default: info)
    pub level: String,
    /// Log format: "json" or "text"
    pub format: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: "text".into(),
        }
    }
}

impl ChunkSealConfig {
    /// Parse a TOML document. Missing sections and keys take their defaults.
    pub fn from_toml_str(content: &str) -> ChunkSealResult<Self> {
        toml::from_str(content).map_err(|e| ChunkSealError::Config(e.to_string()))
    }

    /// Load from `path`, falling back to defaults when the file does not exist.
    pub fn load(path: &Path) -> ChunkSealResult<Self> {
        if !path.exists() {
            tracing::debug!("config file not found: {} (using defaults)", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| ChunkSealError::Config(format!("parsing {}: {e}", path.display())))
    }

    pub fn to_toml_string(&self) -> ChunkSealResult<String> {
        toml::to_string_pretty(self).map_err(|e| ChunkSealError::Config(e.to_string()))
    }
}
