//! Runtime configuration loaded from `config.toml` in the data root.
//!
//! ```toml
//! [countdown]
//! tick_interval_ms = 1000
//!
//! [display]
//! idle_label = "Cronos"
//! active_prefix = "Focus ends in"
//! ```
//!
//! Every section and key is optional; a missing file yields defaults.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{CronosError, Result};

const DEFAULT_TICK_INTERVAL_MS: u64 = 1000;
const MIN_TICK_INTERVAL_MS: u64 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CronosConfig {
    #[serde(default)]
    pub countdown: CountdownConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountdownConfig {
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
}

impl Default for CountdownConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
        }
    }
}

impl CountdownConfig {
    /// Reconciliation period, floored so a typo cannot spin the timer thread.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.max(MIN_TICK_INTERVAL_MS))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Shown when no cycle is active.
    #[serde(default = "default_idle_label")]
    pub idle_label: String,
    /// Prepended to the `MM:SS` remaining time while a cycle runs.
    #[serde(default = "default_active_prefix")]
    pub active_prefix: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            idle_label: default_idle_label(),
            active_prefix: default_active_prefix(),
        }
    }
}

impl DisplayConfig {
    pub fn active_label(&self, remaining: &str) -> String {
        if self.active_prefix.trim().is_empty() {
            remaining.to_string()
        } else {
            format!("{} {}", self.active_prefix.trim_end(), remaining)
        }
    }
}

fn default_tick_interval_ms() -> u64 {
    DEFAULT_TICK_INTERVAL_MS
}

fn default_idle_label() -> String {
    "Cronos".to_string()
}

fn default_active_prefix() -> String {
    "Focus ends in".to_string()
}

/// Loads configuration from `path`, returning defaults if the file does not exist.
pub fn load_config(path: &Path) -> Result<CronosConfig> {
    if !path.exists() {
        return Ok(CronosConfig::default());
    }

    let content = fs_err::read_to_string(path).map_err(|source| CronosError::Io {
        context: format!("reading config {}", path.display()),
        source,
    })?;
    toml::from_str::<CronosConfig>(&content).map_err(|err| CronosError::ConfigMalformed {
        path: path.to_path_buf(),
        details: err.to_string(),
    })
}

/// Like [`load_config`], but a malformed file logs a warning and yields defaults.
pub fn load_config_or_default(path: &Path) -> CronosConfig {
    load_config(path).unwrap_or_else(|err| {
        tracing::warn!(error = %err, "Failed to load config; using defaults");
        CronosConfig::default()
    })
}
