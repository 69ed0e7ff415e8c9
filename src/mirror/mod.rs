//! Mirrors bind in-memory entities to their backing store.
//!
//! A tree is backed by a [`DirMirror`]; a document by at most one
//! [`FileMirror`]. The set is closed: capability checks go through
//! [`Mirror::has_commit_capability`], never through type inspection.

mod dir_mirror;
mod file_mirror;

pub use dir_mirror::{DirMirror, Entry, EntryKind};
pub use file_mirror::FileMirror;

use crate::path_key::PathKey;

/// A backing store attached to a tree or a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mirror {
    /// Directory listing backing a project tree
    Directory(DirMirror),
    /// Single file backing a document
    File(FileMirror),
}

impl Mirror {
    /// The identity of the backing store.
    pub fn path(&self) -> &PathKey {
        match self {
            Mirror::Directory(dir) => dir.root_path(),
            Mirror::File(file) => file.path(),
        }
    }

    /// Whether content can be committed through this mirror.
    pub fn has_commit_capability(&self) -> bool {
        matches!(self, Mirror::File(_))
    }

    pub fn is_directory(&self) -> bool {
        matches!(self, Mirror::Directory(_))
    }

    /// Path of a file mirror; `None` for directory mirrors.
    pub fn file_path(&self) -> Option<&PathKey> {
        match self {
            Mirror::File(file) => Some(file.path()),
            Mirror::Directory(_) => None,
        }
    }

    pub fn as_file(&self) -> Option<&FileMirror> {
        match self {
            Mirror::File(file) => Some(file),
            Mirror::Directory(_) => None,
        }
    }

    pub fn as_directory(&self) -> Option<&DirMirror> {
        match self {
            Mirror::Directory(dir) => Some(dir),
            Mirror::File(_) => None,
        }
    }
}

impl From<FileMirror> for Mirror {
    fn from(file: FileMirror) -> Self {
        Mirror::File(file)
    }
}

impl From<DirMirror> for Mirror {
    fn from(dir: DirMirror) -> Self {
        Mirror::Directory(dir)
    }
}
