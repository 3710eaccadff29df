// SPDX-License-Identifier: MIT OR Apache-2.0
//! Application errors.

use crate::script::ScriptError;
use bear_avatar_sequencer::ConfigError;
use std::path::PathBuf;
use thiserror::Error;

/// Top-level application errors
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded or saved
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Replay script could not be loaded
    #[error("Script error: {0}")]
    Script(#[from] ScriptError),

    /// The asset directory does not exist
    #[error("Asset directory not found: {}", .0.display())]
    MissingAssetDir(PathBuf),

    /// File watcher failure
    #[error("File watcher error: {0}")]
    Watch(#[from] notify::Error),

    /// JSON output failure
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// RON output failure
    #[error("RON error: {0}")]
    Ron(#[from] ron::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for application operations
pub type Result<T> = std::result::Result<T, AppError>;
