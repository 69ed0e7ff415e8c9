//! Most-recently-used file tracking.
//!
//! The list is duplicate free and kept most-recent-first. Opening a file
//! puts it at rank 1; the file being left (the one focused at the time)
//! goes to rank 2, regardless of where either was before. The last two
//! touched files are therefore always the top two.

use crate::path_key::PathKey;
use log::debug;

/// Ordered recency list of opened files.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MruTracker {
    /// Most recent first
    entries: Vec<PathKey>,
}

impl MruTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record navigation from `current` (the focused file, if any) to `new_path`.
    ///
    /// Re-opening the focused file is not a navigation event and leaves the
    /// list unchanged.
    pub fn record_access(&mut self, current: Option<&PathKey>, new_path: PathKey) {
        if current == Some(&new_path) {
            return;
        }

        self.entries.retain(|p| p != &new_path);
        self.entries.insert(0, new_path);

        if let Some(current) = current {
            self.entries.retain(|p| p != current);
            self.entries.insert(1, current.clone());
        }

        debug!("MRU now holds {} files", self.entries.len());
    }

    /// Copy of the list, most recent first.
    pub fn snapshot(&self) -> Vec<PathKey> {
        self.entries.clone()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PathKey> {
        self.entries.iter()
    }

    pub fn contains(&self, path: &PathKey) -> bool {
        self.entries.contains(path)
    }

    /// Drop a path from the list (e.g. after its file was deleted).
    pub fn forget(&mut self, path: &PathKey) -> bool {
        let before = self.entries.len();
        self.entries.retain(|p| p != path);
        before != self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
