//! Engine configuration
//!
//! Tunable limits for the dispatch and reporting machinery, collected in
//! one place with explanations of their purpose. The config is passed
//! into `Room::new` explicitly; there is no global accessor.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core::error::{EngineError, Result};

/// Configuration for a room's dispatch and reporting machinery
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Maximum depth of re-entrant event dispatch
    ///
    /// Each link invocation that fires further events descends one level.
    /// The link graph is fixed at load time, but a self-referential cycle
    /// (an action whose event links back to the same action) would recurse
    /// forever; beyond this depth the dispatch is reported and dropped.
    pub max_dispatch_depth: u32,

    /// Number of report entries retained before old ones are dropped
    ///
    /// Dropped entries are counted, so diagnostics can tell when the
    /// buffer was too small.
    pub report_capacity: usize,

    /// Seed for the room's RNG (spawn-point selection)
    ///
    /// Fixed seeding keeps spawner behavior reproducible across runs.
    pub rng_seed: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_dispatch_depth: 64,
            report_capacity: 512,
            rng_seed: 0xC17A_DE1,
        }
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.max_dispatch_depth == 0 {
            return Err("max_dispatch_depth must be at least 1".into());
        }
        if self.report_capacity == 0 {
            return Err("report_capacity must be at least 1".into());
        }
        Ok(())
    }

    /// Parse a config from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(text).map_err(|e| EngineError::InvalidConfig(e.to_string()))?;
        config.validate().map_err(EngineError::InvalidConfig)?;
        Ok(config)
    }

    /// Load a config from a TOML file on disk
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}
