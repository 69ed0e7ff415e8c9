//! Small persistent key-value store.
//!
//! Used to remember values such as the last directory picked in a file
//! dialog across sessions. Stored as a flat JSON object of strings.

use crate::config::persistence::{ensure_dir, get_config_dir};
use crate::error::{Error, Result, ResultExt};
use log::{debug, warn};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// String key-value storage, optionally backed by a JSON file.
#[derive(Debug, Clone, Default)]
pub struct Storage {
    /// `None` for a purely in-memory store
    path: Option<PathBuf>,
    values: BTreeMap<String, String>,
}

impl Storage {
    /// Open the named store in the application config directory.
    ///
    /// Falls back to an in-memory store if the directory is unknown.
    pub fn open(name: &str) -> Self {
        match get_config_dir() {
            Ok(dir) => Self::open_at(dir.join(format!("{}.json", name))),
            Err(e) => {
                warn!("Storage '{}' is not persisted: {}", name, e);
                Self::in_memory()
            }
        }
    }

    /// Open a store backed by the file at `path`.
    ///
    /// A missing or unreadable file starts out empty.
    pub fn open_at(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = read_values(&path).unwrap_or_warn_default(
            BTreeMap::new(),
            &format!("Failed to read storage {}", path.display()),
        );
        Self {
            path: Some(path),
            values,
        }
    }

    pub fn in_memory() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Set `key` and persist the store.
    ///
    /// The in-memory value is always updated; a failed write is returned
    /// to the caller.
    pub fn set(&mut self, key: &str, value: impl Into<String>) -> Result<()> {
        self.values.insert(key.to_string(), value.into());
        self.flush()
    }

    fn flush(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(dir) = path.parent() {
            ensure_dir(dir)?;
        }
        let json = serde_json::to_string_pretty(&self.values)?;

        // Write the backup first, then rename it over the real file
        let backup = backup_path(path);
        fs::write(&backup, json).map_err(|e| Error::ConfigSave {
            path: backup.clone(),
            source: Box::new(e),
        })?;
        fs::rename(&backup, path).map_err(|e| Error::ConfigSave {
            path: path.clone(),
            source: Box::new(e),
        })?;
        debug!("Storage written to {}", path.display());
        Ok(())
    }
}

fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".bak");
    path.with_file_name(name)
}

fn read_values(path: &Path) -> Result<BTreeMap<String, String>> {
    if !path.exists() {
        return Ok(BTreeMap::new());
    }
    let contents = fs::read_to_string(path).map_err(|e| Error::ConfigLoad {
        path: path.to_path_buf(),
        source: Box::new(e),
    })?;
    if contents.trim().is_empty() {
        return Ok(BTreeMap::new());
    }
    Ok(serde_json::from_str(&contents)?)
}
