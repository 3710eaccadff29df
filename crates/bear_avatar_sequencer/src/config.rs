// SPDX-License-Identifier: MIT OR Apache-2.0
//! Sequencer configuration.
//!
//! Frame intervals, the progress cap and the catalog patterns, persisted
//! as RON. Every field has a default, so a partial file is valid.

use crate::catalog::CatalogPatterns;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Current configuration format version
pub const CONFIG_FORMAT_VERSION: u32 = 1;

/// Default configuration file name
pub const CONFIG_FILE_NAME: &str = "bear_avatar.ron";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading or writing the file failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid RON for this schema
    #[error("Parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// Serializing to RON failed
    #[error("Serialization error: {0}")]
    Serialize(#[from] ron::Error),

    /// The file was written by a newer version
    #[error("Config version {found} is newer than supported version {supported}")]
    UnsupportedVersion {
        /// Version found in the file
        found: u32,
        /// Highest version this build understands
        supported: u32,
    },

    /// A value is out of range
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Result type for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Sequencer timing and catalog settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SequencerConfig {
    /// Format version
    pub version: u32,
    /// Progress value that maps to the last watching frame
    pub progress_cap: u32,
    /// Per-frame interval when covering the eyes (milliseconds)
    pub hide_interval_ms: u64,
    /// Per-frame interval when uncovering the eyes (milliseconds)
    pub unhide_interval_ms: u64,
    /// Per-frame interval when peeking (milliseconds)
    pub peek_interval_ms: u64,
    /// Catalog name patterns
    pub patterns: CatalogPatterns,
}

impl Default for SequencerConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_FORMAT_VERSION,
            progress_cap: 30,
            hide_interval_ms: 40,
            unhide_interval_ms: 60,
            peek_interval_ms: 50,
            patterns: CatalogPatterns::default(),
        }
    }
}

impl SequencerConfig {
    /// Parse and validate a RON document
    pub fn from_ron_str(content: &str) -> Result<Self> {
        let config: SequencerConfig = ron::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_ron_str(&content)?;
        tracing::debug!("Loaded sequencer config from {:?}", path);
        Ok(config)
    }

    /// Save the configuration as pretty RON
    pub fn save(&self, path: &Path) -> Result<()> {
        let pretty = ron::ser::PrettyConfig::default()
            .struct_names(true)
            .enumerate_arrays(false);
        let content = ron::ser::to_string_pretty(self, pretty)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Check version and value ranges
    pub fn validate(&self) -> Result<()> {
        if self.version > CONFIG_FORMAT_VERSION {
            return Err(ConfigError::UnsupportedVersion {
                found: self.version,
                supported: CONFIG_FORMAT_VERSION,
            });
        }
        if self.progress_cap == 0 {
            return Err(ConfigError::Invalid("progress_cap must be greater than zero".into()));
        }
        Ok(())
    }

    /// Interval for `hiding` played forward
    pub fn hide_interval(&self) -> Duration {
        Duration::from_millis(self.hide_interval_ms)
    }

    /// Interval for `hiding` played in reverse
    pub fn unhide_interval(&self) -> Duration {
        Duration::from_millis(self.unhide_interval_ms)
    }

    /// Interval for `peeking` in either direction
    pub fn peek_interval(&self) -> Duration {
        Duration::from_millis(self.peek_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SequencerConfig::default();
        assert_eq!(config.progress_cap, 30);
        assert_eq!(config.hide_interval(), Duration::from_millis(40));
        assert_eq!(config.unhide_interval(), Duration::from_millis(60));
        assert_eq!(config.peek_interval(), Duration::from_millis(50));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_document_uses_defaults() {
        let config = SequencerConfig::from_ron_str("(progress_cap: 12)").unwrap();
        assert_eq!(config.progress_cap, 12);
        assert_eq!(config.peek_interval_ms, 50);
        assert_eq!(config.patterns.hiding.as_str(), "hide_bear_*.png");
    }

    #[test]
    fn test_rejects_newer_version() {
        let err = SequencerConfig::from_ron_str("(version: 99)").unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedVersion { found: 99, .. }));
    }

    #[test]
    fn test_rejects_zero_cap() {
        let err = SequencerConfig::from_ron_str("(progress_cap: 0)").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);

        let config = SequencerConfig {
            peek_interval_ms: 75,
            ..SequencerConfig::default()
        };
        config.save(&path).unwrap();

        let loaded = SequencerConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }
}
