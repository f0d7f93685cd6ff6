//! Export runtime configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::SimSlot;

/// Configuration load failure.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("reading config: {0}")]
    Io(#[from] std::io::Error),
    /// The JSON did not match [`ExportConfig`].
    #[error("parsing config: {0}")]
    Json(#[from] serde_json::Error),
}

/// Settings for one export runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Target card.
    pub slot: SimSlot,
    /// SIM property reads before giving up with "SIM not ready".
    pub space_read_attempts: u32,
    /// Bound of the command queue between handle and runtime loop.
    pub command_queue_bound: usize,
    /// Capacity of the broadcast event channel.
    pub event_capacity: usize,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            slot: SimSlot::Single,
            space_read_attempts: 3,
            command_queue_bound: 16,
            event_capacity: 256,
        }
    }
}

impl ExportConfig {
    /// Parses a JSON document; missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }
}
