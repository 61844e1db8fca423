//! Configuration file loading for sift.
//!
//! Reads `sift.json` and provides typed access to all settings.
//! Falls back to sensible defaults when the config file is missing or incomplete.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::types::DifficultyTier;

/// Name of the config file looked up by [`SiftConfig::load`].
pub const CONFIG_FILE: &str = "sift.json";

/// Top-level sift configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SiftConfig {
    #[serde(default)]
    pub executor: ExecutorConfig,
    #[serde(default)]
    pub scaffold: ScaffoldConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

/// Child-process execution settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutorConfig {
    #[serde(default = "default_interpreter")]
    pub interpreter: String,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    #[serde(default = "default_test_timeout_seconds")]
    pub test_timeout_seconds: u64,
    /// Per-stream capture limit; anything beyond it is drained and dropped.
    #[serde(default = "default_max_output_bytes")]
    pub max_output_bytes: usize,
    #[serde(default = "default_memory_sample_interval_ms")]
    pub memory_sample_interval_ms: u64,
    /// How long to keep reading output after the child exits or is killed.
    /// Descendants that left the process group can hold the pipes open.
    #[serde(default = "default_output_drain_grace_ms")]
    pub output_drain_grace_ms: u64,
}

/// Test generation settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScaffoldConfig {
    #[serde(default)]
    pub default_difficulty: DifficultyTier,
}

/// Structural analysis thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default = "default_max_parameters")]
    pub max_parameters: usize,
}

fn default_interpreter() -> String {
    "python3".to_string()
}
fn default_timeout_seconds() -> u64 {
    10
}
fn default_test_timeout_seconds() -> u64 {
    30
}
fn default_max_output_bytes() -> usize {
    1024 * 1024
}
fn default_memory_sample_interval_ms() -> u64 {
    20
}
fn default_output_drain_grace_ms() -> u64 {
    500
}
fn default_max_parameters() -> usize {
    5
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            interpreter: default_interpreter(),
            timeout_seconds: default_timeout_seconds(),
            test_timeout_seconds: default_test_timeout_seconds(),
            max_output_bytes: default_max_output_bytes(),
            memory_sample_interval_ms: default_memory_sample_interval_ms(),
            output_drain_grace_ms: default_output_drain_grace_ms(),
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            max_parameters: default_max_parameters(),
        }
    }
}

impl SiftConfig {
    /// Load configuration from `sift.json` inside the given directory.
    /// Returns defaults if the file doesn't exist or can't be parsed.
    pub fn load(dir: &Path) -> Self {
        let config_path = dir.join(CONFIG_FILE);
        let content = match std::fs::read_to_string(&config_path) {
            Ok(c) => c,
            Err(_) => return Self::default(),
        };
        match serde_json::from_str(&content) {
            Ok(cfg) => cfg,
            Err(e) => {
                tracing::warn!(
                    path = %config_path.display(),
                    error = %e,
                    "failed to parse config, using defaults"
                );
                Self::default()
            }
        }
    }
}
