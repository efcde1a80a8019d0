//! Discovery configuration, loaded from TOML.
//!
//! ```toml
//! parallel = true
//! worker_ratio = 0.5
//!
//! [markers]
//! vertex = "vertex_shader"
//! fragment = "fragment_shader"
//! compute = "compute_shader"
//! ```

use crate::domain::function::ShaderMarkers;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DiscoveryConfig {
    pub markers: ShaderMarkers,
    /// Run independent entry points on the rayon pool.
    pub parallel: bool,
    /// Share of CPU cores given to the pool.
    pub worker_ratio: f64,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            markers: ShaderMarkers::default(),
            parallel: true,
            worker_ratio: 0.5,
        }
    }
}

impl DiscoveryConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("Invalid config {}", path.display()))
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }
}
