//! Runtime configuration.
//!
//! Loaded from an optional YAML file; every field has a default so an empty
//! or absent file yields a fully usable config.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrainConfig {
    pub server_name: String,
    pub server_version: String,
    /// Minimum pattern support for a flow to be considered at all.
    pub min_gap_support: f64,
    /// Findings below this confidence are dropped before reporting.
    pub min_confidence: f64,
    /// Hard cap on list lengths in tool responses.
    pub max_suggestions: usize,
    pub default_test_framework: String,
    pub test_style: String,
    /// Relative drop between consecutive flow steps that counts as a dropoff.
    pub dropoff_threshold: f64,
    /// Branch-construct count above which a function is flagged as complex.
    pub complexity_threshold: usize,
}

impl Default for BrainConfig {
    fn default() -> Self {
        BrainConfig {
            server_name: "dev-brain".to_string(),
            server_version: "1.0.0".to_string(),
            min_gap_support: 0.05,
            min_confidence: 0.5,
            max_suggestions: 20,
            default_test_framework: "pytest".to_string(),
            test_style: "unit".to_string(),
            dropoff_threshold: 0.3,
            complexity_threshold: 5,
        }
    }
}

impl BrainConfig {
    /// Load config from a YAML file, or return defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<BrainConfig> {
        match path {
            Some(path) => {
                let raw = fs::read_to_string(path)
                    .with_context(|| format!("failed to read config file: {}", path.display()))?;
                let config: BrainConfig = serde_yaml::from_str(&raw)
                    .with_context(|| format!("failed to parse config file: {}", path.display()))?;
                Ok(config)
            }
            None => Ok(BrainConfig::default()),
        }
    }
}
