//! Discovery configuration.
//!
//! Loaded from YAML, with every field optional:
//!
//! ```yaml
//! registry_url: https://wiki.tox.chat/users/nodes
//! layout: status
//! probe_timeout: 2s
//! http_timeout: 10s
//! rng_seed: 42
//! ```

use crate::registry::{DEFAULT_REGISTRY_URL, TableLayout};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Settings for a [`Discovery`](crate::Discovery) instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    /// Registry page listing the nodes
    #[serde(default = "default_registry_url")]
    pub registry_url: String,

    /// Table layout currently used by the registry
    #[serde(default)]
    pub layout: TableLayout,

    /// Per-node probe timeout
    #[serde(default = "default_probe_timeout", with = "humantime_serde")]
    pub probe_timeout: Duration,

    /// Timeout for the registry HTTP request
    #[serde(default = "default_http_timeout", with = "humantime_serde")]
    pub http_timeout: Duration,

    /// Fixed seed for random node selection. Entropy when unset.
    #[serde(default)]
    pub rng_seed: Option<u64>,
}

fn default_registry_url() -> String {
    DEFAULT_REGISTRY_URL.to_string()
}

fn default_probe_timeout() -> Duration {
    Duration::from_secs(2)
}

fn default_http_timeout() -> Duration {
    Duration::from_secs(10)
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            registry_url: default_registry_url(),
            layout: TableLayout::default(),
            probe_timeout: default_probe_timeout(),
            http_timeout: default_http_timeout(),
            rng_seed: None,
        }
    }
}

impl DiscoveryConfig {
    /// Parse a YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).context("invalid discovery config")
    }

    /// Load a YAML config file.
    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let yaml = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_yaml_str(&yaml).with_context(|| format!("in {}", path.display()))
    }
}
