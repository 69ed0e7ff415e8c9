//! File mirror: the backing store of a single document.

use crate::error::{Error, Result};
use crate::path_key::PathKey;
use log::{debug, info};
use std::fs;
use std::path::PathBuf;

/// Mirror over one file on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMirror {
    path: PathKey,
}

impl FileMirror {
    pub fn new(path: PathKey) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &PathKey {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Current content of the backing file.
    ///
    /// A file that does not exist yet reads as empty.
    pub fn read(&self) -> Result<String> {
        if !self.path.as_path().exists() {
            debug!("{} does not exist yet, reading as empty", self.path);
            return Ok(String::new());
        }
        fs::read_to_string(self.path.as_path()).map_err(|e| Error::Read {
            path: self.path.as_path().to_path_buf(),
            source: e,
        })
    }

    /// Write `content` to the backing file.
    ///
    /// The bytes go to a sibling temp file first which is then renamed over
    /// the target, so a failure leaves the previous file content in place.
    /// An existing target's permissions carry over to the new file.
    /// `path()` is the same before and after, whatever the outcome.
    pub fn commit(&self, content: &[u8]) -> Result<()> {
        let target = self.path.as_path();
        let staging = self.staging_path();

        let written = fs::write(&staging, content)
            .and_then(|()| match fs::metadata(target) {
                Ok(meta) if meta.is_file() => fs::set_permissions(&staging, meta.permissions()),
                _ => Ok(()),
            })
            .and_then(|()| fs::rename(&staging, target));
        if let Err(e) = written {
            let _ = fs::remove_file(&staging);
            return Err(Error::Write {
                path: target.to_path_buf(),
                source: e,
            });
        }

        info!("Saved {} ({} bytes)", self.path, content.len());
        Ok(())
    }

    fn staging_path(&self) -> PathBuf {
        let name = self.path.file_name().unwrap_or_else(|| "file".to_string());
        let dir = self
            .path
            .parent()
            .map(|p| p.to_path_buf())
            .unwrap_or_default();
        dir.join(format!(".{}.tmp-save", name))
    }
}
