use std::path::Path;

use quorum_io::TransferConfig;
use serde::{Deserialize, Serialize};

use crate::error::{EnvError, EnvResult};

/// A per-target log level override, e.g. `quorum_io = "debug"`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogDirective {
    pub target: String,
    pub level: String,
}

impl LogDirective {
    pub fn new(target: impl Into<String>, level: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            level: level.into(),
        }
    }
}

/// Logging configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Level applied to every target without an override.
    pub default_level: String,
    /// Per-target overrides, applied in order.
    pub directives: Vec<LogDirective>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            default_level: "info".to_string(),
            directives: Vec::new(),
        }
    }
}

/// Top-level configuration file for the utility layer.
///
/// ```toml
/// [logging]
/// default_level = "warn"
/// directives = [{ target = "quorum_io", level = "debug" }]
///
/// [transfer]
/// drain_buffer_size = 8192
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UtilConfig {
    pub logging: LoggingConfig,
    pub transfer: TransferConfig,
}

impl UtilConfig {
    /// Parse configuration from TOML text. Missing sections use defaults.
    pub fn from_toml_str(text: &str) -> EnvResult<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> EnvResult<Self> {
        let text = std::fs::read_to_string(path)?;
        toml::from_str(&text).map_err(|source| EnvError::Config {
            path: path.to_path_buf(),
            source,
        })
    }
}
