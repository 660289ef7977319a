//! Bridge configuration
//!
//! Typed configuration for bridge initialization, loadable from YAML.
//!
//! # Example
//!
//! ```yaml
//! # Background threads for blocking saved-model runs
//! worker_threads: 4
//! ```

use crate::error::{BridgeError, BridgeResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Settings fixed at bridge initialization
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Number of worker threads for blocking saved-model runs
    pub worker_threads: usize,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            worker_threads: num_cpus::get().max(1),
        }
    }
}

impl BridgeConfig {
    /// Configuration with an explicit worker-thread count
    pub fn with_worker_threads(worker_threads: usize) -> Self {
        Self { worker_threads }
    }

    /// Load configuration from a YAML string
    pub fn from_yaml(content: &str) -> BridgeResult<Self> {
        serde_yaml::from_str(content)
            .map_err(|e| BridgeError::config(format!("Failed to parse config YAML: {}", e)))
    }

    /// Load configuration from a file
    pub fn from_file(path: &Path) -> BridgeResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }
}
