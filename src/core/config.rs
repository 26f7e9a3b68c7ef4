//! Engine configuration
//!
//! The tunable knobs are collected here so front-ends configure the engine
//! in one place, with a TOML loader for file-driven setups.

use crate::core::error::EngineError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Configuration for a combat engine instance
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Echo every published event through `tracing::debug!`
    ///
    /// Useful when wiring up a new front-end: the full event stream is
    /// visible without writing a subscriber.
    pub debug: bool,

    /// Capacity of the event bus ring buffer
    ///
    /// Once the log holds this many events the oldest are evicted first.
    /// Replay can only reach back this far.
    pub max_log_size: usize,

    /// Seed for the default dice source
    ///
    /// Two engines built from the same seed and fed the same calls produce
    /// identical combats. Tests that need exact rolls inject a scripted
    /// roller instead.
    pub seed: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            debug: false,
            max_log_size: 1000,
            seed: 42,
        }
    }
}

impl EngineConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.max_log_size == 0 {
            return Err(EngineError::InvalidConfig(
                "max_log_size must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Parse a config from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, EngineError> {
        let config: EngineConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config from a TOML file
    pub fn load(path: &Path) -> Result<Self, EngineError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}
