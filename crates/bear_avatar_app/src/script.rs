// SPDX-License-Identifier: MIT OR Apache-2.0
//! Replay scripts.
//!
//! A script is a RON list of timed form actions:
//!
//! ```ron
//! (events: [
//!     (at_ms: 0, action: TypeEmail("bear@woods.io")),
//!     (at_ms: 400, action: Focus(Password)),
//!     (at_ms: 900, action: ShowPassword(true)),
//! ])
//! ```

use bear_avatar_sequencer::Focus;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Script errors
#[derive(Debug, Error)]
pub enum ScriptError {
    /// Reading the file failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not a valid script
    #[error("Parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// Events must not go back in time
    #[error("Event {index} at {at_ms}ms is earlier than the previous event at {previous_ms}ms")]
    OutOfOrder {
        /// Position of the offending event
        index: usize,
        /// Its time
        at_ms: u64,
        /// Time of the event before it
        previous_ms: u64,
    },
}

/// A form action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// Focus a field
    Focus(Focus),
    /// Show or mask the password
    ShowPassword(bool),
    /// Flip password visibility
    TogglePassword,
    /// Replace the email text
    TypeEmail(String),
    /// Set progress directly
    Progress(u32),
}

/// An action at a point in time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptEvent {
    /// Milliseconds from the start of the replay
    pub at_ms: u64,
    /// What happens
    pub action: Action,
}

impl ScriptEvent {
    /// Event time as a duration
    pub fn at(&self) -> Duration {
        Duration::from_millis(self.at_ms)
    }
}

/// Ordered list of events
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Script {
    /// Events in time order
    pub events: Vec<ScriptEvent>,
}

impl Script {
    /// Parse and validate a RON document
    pub fn from_ron_str(content: &str) -> Result<Self, ScriptError> {
        let script: Script = ron::from_str(content)?;
        script.validate()?;
        Ok(script)
    }

    /// Load and validate a script file
    pub fn load(path: &Path) -> Result<Self, ScriptError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_ron_str(&content)
    }

    /// Check events are in non-decreasing time order
    pub fn validate(&self) -> Result<(), ScriptError> {
        for (index, pair) in self.events.windows(2).enumerate() {
            if pair[1].at_ms < pair[0].at_ms {
                return Err(ScriptError::OutOfOrder {
                    index: index + 1,
                    at_ms: pair[1].at_ms,
                    previous_ms: pair[0].at_ms,
                });
            }
        }
        Ok(())
    }
}
