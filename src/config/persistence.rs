//! Configuration file persistence for project-tree
//!
//! This module handles loading and saving the settings file in the
//! platform-specific configuration directory with graceful fallback to
//! defaults.

use crate::config::Settings;
use crate::error::{Error, Result, ResultExt};
use log::{debug, info, warn};
use std::fs;
use std::path::{Path, PathBuf};

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

/// Application name used for the config directory
pub(crate) const APP_NAME: &str = "project-tree";

/// Configuration file name
const CONFIG_FILE_NAME: &str = "settings.json";

/// Backup configuration file name (used during atomic writes)
const CONFIG_BACKUP_NAME: &str = "settings.json.bak";

// ─────────────────────────────────────────────────────────────────────────────
// Platform-Specific Directory Resolution
// ─────────────────────────────────────────────────────────────────────────────

/// Get the platform-specific configuration directory for the application.
///
/// - **Windows**: `%APPDATA%\project-tree\`
/// - **macOS**: `~/Library/Application Support/project-tree/`
/// - **Linux**: `~/.config/project-tree/`
///
/// # Errors
///
/// Returns `Error::ConfigDirNotFound` if the config directory cannot be determined
/// (e.g., if the HOME environment variable is not set).
pub fn get_config_dir() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|base| base.join(APP_NAME))
        .ok_or(Error::ConfigDirNotFound)
}

/// Ensure `dir` exists, creating it if necessary.
pub(crate) fn ensure_dir(dir: &Path) -> Result<()> {
    if !dir.exists() {
        debug!("Creating config directory: {}", dir.display());
        fs::create_dir_all(dir).map_err(|e| Error::ConfigSave {
            path: dir.to_path_buf(),
            source: Box::new(e),
        })?;
    }
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Load Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Load settings from the default config location.
///
/// A missing, empty or corrupted file yields default settings; problems
/// are logged at warning level.
pub fn load_config() -> Settings {
    get_config_dir()
        .and_then(|dir| load_config_from(&dir))
        .unwrap_or_warn_default(Settings::default(), "Failed to load configuration")
}

/// Load settings from the settings file in `config_dir`.
pub fn load_config_from(config_dir: &Path) -> Result<Settings> {
    let config_path = config_dir.join(CONFIG_FILE_NAME);

    if !config_path.exists() {
        debug!(
            "Config file not found at {}, using defaults",
            config_path.display()
        );
        return Ok(Settings::default());
    }

    let contents = fs::read_to_string(&config_path).map_err(|e| Error::ConfigLoad {
        path: config_path.clone(),
        source: Box::new(e),
    })?;

    if contents.trim().is_empty() {
        debug!("Config file is empty, using defaults");
        return Ok(Settings::default());
    }

    let settings = Settings::from_json_sanitized(&contents).map_err(|e| {
        warn!(
            "Config file at {} contains invalid JSON: {}",
            config_path.display(),
            e
        );
        Error::ConfigParse {
            message: format!("Failed to parse config file: {}", e),
            source: Some(Box::new(e)),
        }
    })?;

    info!(
        "Configuration loaded successfully from {}",
        config_path.display()
    );
    Ok(settings)
}

// ─────────────────────────────────────────────────────────────────────────────
// Save Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Save settings into `config_dir`, writing a backup file and renaming it
/// over the real one.
pub fn save_config_to(config_dir: &Path, settings: &Settings) -> Result<()> {
    ensure_dir(config_dir)?;
    let config_path = config_dir.join(CONFIG_FILE_NAME);
    let backup_path = config_dir.join(CONFIG_BACKUP_NAME);

    let json = serde_json::to_string_pretty(settings).map_err(|e| Error::ConfigSave {
        path: config_path.clone(),
        source: Box::new(e),
    })?;

    fs::write(&backup_path, &json).map_err(|e| Error::ConfigSave {
        path: backup_path.clone(),
        source: Box::new(e),
    })?;

    fs::rename(&backup_path, &config_path).map_err(|e| Error::ConfigSave {
        path: config_path.clone(),
        source: Box::new(e),
    })?;

    info!("Configuration saved to {}", config_path.display());
    Ok(())
}

/// Write `settings` into `config_dir` unless a settings file exists there.
///
/// Returns `true` if a file was written.
pub fn init_config_in(config_dir: &Path, settings: &Settings) -> Result<bool> {
    if config_dir.join(CONFIG_FILE_NAME).exists() {
        return Ok(false);
    }
    save_config_to(config_dir, settings)?;
    Ok(true)
}

/// Create the settings file on first run so users have something to edit.
///
/// Errors are logged, not returned. Returns `true` if a file was written.
pub fn init_config(settings: &Settings) -> bool {
    get_config_dir()
        .and_then(|dir| init_config_in(&dir, settings))
        .unwrap_or_warn_default(false, "Failed to write initial configuration")
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
