//! Durable key-value slots.
//!
//! A slot stores one string value per key. [`FileSlot`] keeps each key in its
//! own `<key>.json` file and writes through a temp file + rename so a crash
//! mid-write never leaves a truncated value behind.

use std::collections::HashMap;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;

use fs_err as fs;
use tempfile::NamedTempFile;

use crate::error::{CronosError, Result};

pub trait StateSlot: Send + Sync {
    /// Returns the stored value, or `None` if the key was never written.
    fn read(&self, key: &str) -> Result<Option<String>>;

    fn write(&self, key: &str, value: &str) -> Result<()>;
}

/// Slot backed by one JSON file per key inside `dir`.
#[derive(Debug, Clone)]
pub struct FileSlot {
    dir: PathBuf,
}

impl FileSlot {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl StateSlot for FileSlot {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(CronosError::Io {
                context: format!("reading state slot {}", key),
                source,
            }),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        let io_err = |context: &str, source: std::io::Error| CronosError::Io {
            context: format!("{} for state slot {}", context, key),
            source,
        };

        fs::create_dir_all(&self.dir).map_err(|e| io_err("creating state dir", e))?;

        let mut temp_file =
            NamedTempFile::new_in(&self.dir).map_err(|e| io_err("creating temp file", e))?;
        temp_file
            .write_all(value.as_bytes())
            .map_err(|e| io_err("writing temp file", e))?;
        temp_file
            .flush()
            .map_err(|e| io_err("flushing temp file", e))?;
        temp_file
            .persist(self.path_for(key))
            .map_err(|e| io_err("committing", e.error))?;
        Ok(())
    }
}

/// In-memory slot for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemorySlot {
    values: Mutex<HashMap<String, String>>,
}

impl MemorySlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(key: &str, value: &str) -> Self {
        let slot = Self::default();
        if let Ok(mut values) = slot.values.lock() {
            values.insert(key.to_string(), value.to_string());
        }
        slot
    }
}

impl StateSlot for MemorySlot {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let values = self.values.lock().unwrap_or_else(|e| e.into_inner());
        Ok(values.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        let mut values = self.values.lock().unwrap_or_else(|e| e.into_inner());
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
