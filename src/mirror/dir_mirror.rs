//! Directory mirror: the backing store of a project tree.

use crate::error::{Error, Result};
use crate::path_key::PathKey;
use log::debug;
use std::cmp::Ordering;
use std::fs;
use walkdir::WalkDir;

/// Kind of a directory entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
}

/// One child of a listed directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Display name (final path component)
    pub name: String,
    /// Canonical path of the entry
    pub path: PathKey,
    pub kind: EntryKind,
}

impl Entry {
    pub fn is_directory(&self) -> bool {
        self.kind == EntryKind::Directory
    }
}

/// Mirror over a directory on disk.
///
/// Holds only the root identity; every listing goes back to the file system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirMirror {
    root: PathKey,
}

impl DirMirror {
    pub fn new(root: PathKey) -> Self {
        Self { root }
    }

    pub fn root_path(&self) -> &PathKey {
        &self.root
    }

    /// List the immediate children of the root.
    pub fn list_children(&self) -> Result<Vec<Entry>> {
        list_directory(&self.root)
    }

    /// List the immediate children of a directory below the root.
    pub fn list_dir(&self, dir: &PathKey) -> Result<Vec<Entry>> {
        list_directory(dir)
    }

    /// Every file below the root, skipping entries whose name `skip` rejects.
    ///
    /// Skipped directories are not descended into. Unreadable entries are
    /// ignored.
    pub fn walk_files<F>(&self, skip: F) -> Vec<PathKey>
    where
        F: Fn(&str) -> bool,
    {
        let walker = WalkDir::new(self.root.as_path())
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                entry.depth() == 0 || !skip(&entry.file_name().to_string_lossy())
            });

        walker
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| PathKey::canonicalize(entry.path()).ok())
            .collect()
    }
}

fn list_directory(dir: &PathKey) -> Result<Vec<Entry>> {
    let read_dir = fs::read_dir(dir.as_path()).map_err(|e| Error::Read {
        path: dir.as_path().to_path_buf(),
        source: e,
    })?;

    let mut entries = Vec::new();
    for entry in read_dir.flatten() {
        let name = match entry.file_name().into_string() {
            Ok(n) => n,
            Err(_) => continue, // Skip entries with invalid UTF-8 names
        };
        // Dangling symlinks and races with deletion drop out here
        let Ok(path) = PathKey::canonicalize(entry.path()) else {
            continue;
        };
        let kind = if path.is_dir() {
            EntryKind::Directory
        } else {
            EntryKind::File
        };
        entries.push(Entry { name, path, kind });
    }

    // Directories first, then alphabetically (case-insensitive)
    entries.sort_by(|a, b| match (a.is_directory(), b.is_directory()) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        _ => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
    });

    debug!("Listed {} entries in {}", entries.len(), dir);
    Ok(entries)
}
