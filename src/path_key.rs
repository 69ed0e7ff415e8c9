//! Canonical path identity.
//!
//! A `PathKey` is the only way the crate compares files: trees, documents
//! and the MRU list all key on it. Construction resolves the working
//! directory, `.`/`..` segments, symlinks and trailing separators, so two
//! keys are equal exactly when they name the same file-system entry.

use crate::error::{Error, Result};
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// A canonical absolute path. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PathKey(PathBuf);

impl PathKey {
    /// Resolve `raw` to its canonical identity.
    ///
    /// Existing entries are resolved fully. An entry that does not exist yet
    /// (the target of a save-as) is identified by its canonical parent
    /// directory plus its file name. Anything else is `Error::InvalidPath`.
    pub fn canonicalize(raw: impl AsRef<Path>) -> Result<Self> {
        let raw = raw.as_ref();
        if raw.as_os_str().is_empty() {
            return Err(Error::invalid_path(raw));
        }

        let absolute = if raw.is_absolute() {
            raw.to_path_buf()
        } else {
            let cwd = std::env::current_dir().map_err(|e| Error::InvalidPath {
                path: raw.to_path_buf(),
                source: Some(e),
            })?;
            cwd.join(raw)
        };

        match fs::canonicalize(&absolute) {
            Ok(resolved) => Ok(Self(resolved)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                Self::resolve_missing(&absolute).ok_or(Error::InvalidPath {
                    path: raw.to_path_buf(),
                    source: Some(err),
                })
            }
            Err(err) => Err(Error::InvalidPath {
                path: raw.to_path_buf(),
                source: Some(err),
            }),
        }
    }

    /// Identity for a not-yet-existing entry whose parent directory exists.
    fn resolve_missing(absolute: &Path) -> Option<Self> {
        let name = absolute.file_name()?;
        let parent = fs::canonicalize(absolute.parent()?).ok()?;
        parent.is_dir().then(|| Self(parent.join(name)))
    }

    /// Structural equality of two keys.
    pub fn equal(a: &PathKey, b: &PathKey) -> bool {
        a == b
    }

    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// The containing directory, if any (`None` only for a root).
    pub fn parent(&self) -> Option<&Path> {
        self.0.parent()
    }

    /// Final path component as UTF-8, lossily converted.
    pub fn file_name(&self) -> Option<String> {
        self.0
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
    }

    pub fn is_dir(&self) -> bool {
        self.0.is_dir()
    }

    pub fn is_file(&self) -> bool {
        self.0.is_file()
    }

    pub fn into_path_buf(self) -> PathBuf {
        self.0
    }
}

impl AsRef<Path> for PathKey {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl fmt::Display for PathKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
