//! Runtime configuration for a `Network`.
//!
//! Everything has a default, so a config file only needs the keys it changes:
//!
//! ```json
//! { "checks": { "singular_scan": true }, "default_flags": 4 }
//! ```

use crate::graph::LegFlags;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config '{path}'")]
    Io { path: String, source: std::io::Error },
    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Switches for the algebra instrumentation layer (`algebra::checks`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckConfig {
    pub nan_scan: bool,
    pub singular_scan: bool,
    /// Dense covariances are not always symmetric mid-computation, so this
    /// stays off unless asked for.
    pub symmetry_scan: bool,
    pub inverse_self_check: bool,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            nan_scan: cfg!(debug_assertions),
            singular_scan: cfg!(debug_assertions),
            symmetry_scan: false,
            inverse_self_check: true,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    pub checks: CheckConfig,
    /// Flags stamped on legs until the reading layer sets its own context.
    pub default_flags: LegFlags,
}

impl NetworkConfig {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&text)
    }
}
