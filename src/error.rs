//! Centralized error handling for project-tree
//!
//! Every fallible operation in the crate returns this error type. All
//! variants are recoverable: they are reported to the calling command
//! handler and never retried internally.

use log::warn;
use std::fmt;
use std::io;
use std::path::PathBuf;

// ─────────────────────────────────────────────────────────────────────────────
// Custom Result Type Alias
// ─────────────────────────────────────────────────────────────────────────────

/// A specialized `Result` type for the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// The centralized error type for the crate.
#[derive(Debug)]
pub enum Error {
    // ─────────────────────────────────────────────────────────────────────────
    // Path & File Errors
    // ─────────────────────────────────────────────────────────────────────────
    /// The raw path could not be resolved to a canonical identity, or it
    /// denotes neither a file nor a directory.
    InvalidPath {
        path: PathBuf,
        source: Option<io::Error>,
    },

    /// A mirror commit failed; nothing was rebound.
    Write { path: PathBuf, source: io::Error },

    /// Reading a file or listing a directory failed.
    Read { path: PathBuf, source: io::Error },

    /// Generic I/O error wrapper
    Io(io::Error),

    // ─────────────────────────────────────────────────────────────────────────
    // Project State Errors
    // ─────────────────────────────────────────────────────────────────────────
    /// A tree operation was requested for a window without a tree.
    NoActiveTree,

    /// A document operation was requested but the window has no focused document.
    NoFocusedDocument,

    /// A file watcher could not be started for a tree root.
    Watch { path: PathBuf, message: String },

    // ─────────────────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────────────────
    /// Failed to load configuration file
    ConfigLoad {
        path: PathBuf,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Failed to save configuration file
    ConfigSave {
        path: PathBuf,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Failed to parse configuration (invalid JSON/format)
    ConfigParse {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration directory not found or inaccessible
    ConfigDirNotFound,
}

impl Error {
    /// Build an `InvalidPath` error with no underlying I/O cause.
    pub fn invalid_path(path: impl Into<PathBuf>) -> Self {
        Error::InvalidPath {
            path: path.into(),
            source: None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::ConfigParse {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Display trait implementation for user-friendly error messages
// ─────────────────────────────────────────────────────────────────────────────
impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidPath { path, source } => match source {
                Some(source) => write!(f, "Invalid path '{}': {}", path.display(), source),
                None => write!(f, "Invalid path '{}'", path.display()),
            },
            Error::Write { path, source } => {
                write!(f, "Failed to write '{}': {}", path.display(), source)
            }
            Error::Read { path, source } => {
                write!(f, "Failed to read '{}': {}", path.display(), source)
            }
            Error::Io(err) => write!(f, "I/O error: {}", err),

            Error::NoActiveTree => write!(f, "No project tree is open in this window"),
            Error::NoFocusedDocument => write!(f, "No document is focused in this window"),
            Error::Watch { path, message } => {
                write!(f, "Failed to watch '{}': {}", path.display(), message)
            }

            Error::ConfigLoad { path, source } => {
                write!(
                    f,
                    "Failed to load configuration from '{}': {}",
                    path.display(),
                    source
                )
            }
            Error::ConfigSave { path, source } => {
                write!(
                    f,
                    "Failed to save configuration to '{}': {}",
                    path.display(),
                    source
                )
            }
            Error::ConfigParse { message, .. } => {
                write!(f, "Invalid configuration format: {}", message)
            }
            Error::ConfigDirNotFound => {
                write!(f, "Configuration directory not found")
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// std::error::Error trait implementation for error chaining
// ─────────────────────────────────────────────────────────────────────────────
impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::InvalidPath { source, .. } => source
                .as_ref()
                .map(|s| s as &(dyn std::error::Error + 'static)),
            Error::Write { source, .. } | Error::Read { source, .. } => Some(source),
            Error::Io(err) => Some(err),
            Error::ConfigLoad { source, .. } => Some(source.as_ref()),
            Error::ConfigSave { source, .. } => Some(source.as_ref()),
            Error::ConfigParse { source, .. } => source
                .as_ref()
                .map(|s| s.as_ref() as &(dyn std::error::Error + 'static)),
            Error::NoActiveTree
            | Error::NoFocusedDocument
            | Error::Watch { .. }
            | Error::ConfigDirNotFound => None,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Graceful Degradation Helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Extension trait for Result to support graceful degradation.
pub trait ResultExt<T> {
    /// If the result is an error, log it at warning level and return the provided default.
    fn unwrap_or_warn_default(self, default: T, context: &str) -> T;
}

impl<T> ResultExt<T> for Result<T> {
    fn unwrap_or_warn_default(self, default: T, context: &str) -> T {
        match self {
            Ok(value) => value,
            Err(err) => {
                warn!("{}: {}. Using default.", context, err);
                default
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
