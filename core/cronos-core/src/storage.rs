//! Storage paths for Cronos data.
//!
//! All on-disk locations hang off one root (default `~/.cronos`, overridable
//! with `CRONOS_HOME`). Tests inject a temp root with [`StorageConfig::with_root`].

use std::env;
use std::path::{Path, PathBuf};

use crate::error::{CronosError, Result};

pub const HOME_ENV_VAR: &str = "CRONOS_HOME";

#[derive(Debug, Clone)]
pub struct StorageConfig {
    root: PathBuf,
}

impl StorageConfig {
    /// Resolves the root from `CRONOS_HOME`, falling back to `~/.cronos`.
    pub fn from_env() -> Result<Self> {
        if let Some(root) = env::var_os(HOME_ENV_VAR).filter(|value| !value.is_empty()) {
            return Ok(Self::with_root(PathBuf::from(root)));
        }
        let home = dirs::home_dir().ok_or(CronosError::HomeDirNotFound)?;
        Ok(Self::with_root(home.join(".cronos")))
    }

    pub fn with_root(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding the persisted state slots.
    pub fn state_dir(&self) -> PathBuf {
        self.root.join("state")
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.root.join("logs")
    }

    pub fn config_file(&self) -> PathBuf {
        self.root.join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_hang_off_root() {
        let storage = StorageConfig::with_root(PathBuf::from("/tmp/cronos-test"));
        assert_eq!(storage.root(), Path::new("/tmp/cronos-test"));
        assert_eq!(storage.state_dir(), PathBuf::from("/tmp/cronos-test/state"));
        assert_eq!(storage.logs_dir(), PathBuf::from("/tmp/cronos-test/logs"));
        assert_eq!(
            storage.config_file(),
            PathBuf::from("/tmp/cronos-test/config.toml")
        );
    }
}
