use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{TrykeyError, TrykeyResult};

/// Top-level configuration (loaded from config.toml)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TrykeyConfig {
    pub log: LogConfig,
    pub derivation: DerivationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Log level (default: warn)
    pub level: String,
    /// Log format: "json" or "text"
    pub format: String,
}

/// Seed derivation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DerivationConfig {
    /// RSA key size in bits (only 2048 is accepted at derivation time)
    pub key_bits: u32,
    /// Reject passphrases whose length differs from `passphrase_len`
    pub exact_length: bool,
    /// Canonical passphrase length in trytes (default: 81)
    pub passphrase_len: usize,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "warn".into(),
            format: "text".into(),
        }
    }
}

impl Default for DerivationConfig {
    fn default() -> Self {
        Self {
            key_bits: 2048,
            exact_length: true,
            passphrase_len: 81,
        }
    }
}

impl TrykeyConfig {
    /// Load the config file at `path`, falling back to defaults when it does not exist.
    pub fn load(path: &Path) -> TrykeyResult<Self> {
        let path = expand_tilde(path);
        if !path.exists() {
            tracing::debug!(path = %path.display(), "config file not found, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| TrykeyError::Config(format!("parsing {}: {e}", path.display())))?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Render the configuration as TOML.
    pub fn to_toml(&self) -> TrykeyResult<String> {
        toml::to_string_pretty(self).map_err(|e| TrykeyError::Config(e.to_string()))
    }
}

/// Expand `~` in path to the user's home directory
pub fn expand_tilde(path: &Path) -> PathBuf {
    if let Some(rest) = path.to_str().and_then(|s| s.strip_prefix("~/")) {
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home).join(rest);
        }
    }
    path.to_path_buf()
}
