//! Config - Coordination Core Configuration

use serde::{Deserialize, Serialize};

use crate::constants::{EVENT_QUEUE_CAPACITY, PICK_DEBOUNCE_MS};
use crate::error::Result;

/// Tunables for the coordination core
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoreConfig {
    /// Capacity of the re-entrant event queue
    pub queue_capacity: usize,
    /// Debounce window for scene picks, in milliseconds
    pub pick_debounce_ms: u64,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            queue_capacity: EVENT_QUEUE_CAPACITY,
            pick_debounce_ms: PICK_DEBOUNCE_MS,
        }
    }
}

impl CoreConfig {
    /// Parse a config from a TOML document
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Serialize the config to a TOML document
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}
