//! Project trees: a mirror plus the browsing state shown for it.
//!
//! Directory contents are loaded lazily: the root is listed when the tree
//! is built, subdirectories when they are expanded. A refresh re-lists the
//! root and every directory loaded so far and keeps the expansion state.

use crate::error::Result;
use crate::mirror::{DirMirror, Entry, Mirror};
use crate::path_key::PathKey;
use log::debug;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_TREE_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TreeId(u64);

impl TreeId {
    fn next() -> Self {
        Self(NEXT_TREE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Hidden Entries
// ─────────────────────────────────────────────────────────────────────────────

/// Names excluded from trees and file searches.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HiddenPatterns {
    /// Exact names or `*suffix` wildcards
    patterns: Vec<String>,
    /// Dot files that stay visible
    allowed_dot_files: Vec<String>,
}

impl HiddenPatterns {
    pub fn new(patterns: Vec<String>, allowed_dot_files: Vec<String>) -> Self {
        Self {
            patterns,
            allowed_dot_files,
        }
    }

    /// Whether an entry called `name` is hidden.
    pub fn hides(&self, name: &str) -> bool {
        if name.starts_with('.') && !self.allowed_dot_files.iter().any(|a| a == name) {
            return true;
        }
        self.patterns.iter().any(|pattern| {
            pattern == name
                || pattern
                    .strip_prefix('*')
                    .is_some_and(|suffix| name.ends_with(suffix))
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tree Nodes
// ─────────────────────────────────────────────────────────────────────────────

/// A node in a project tree.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeNode {
    /// Display name of the file or folder
    pub name: String,
    pub path: PathKey,
    pub kind: TreeNodeKind,
    /// Whether this node is expanded in the UI (for directories)
    pub is_expanded: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TreeNodeKind {
    File,
    /// `children` is `None` until the directory is first expanded
    Directory { children: Option<Vec<TreeNode>> },
}

impl TreeNode {
    fn from_entry(entry: Entry) -> Self {
        let kind = if entry.is_directory() {
            TreeNodeKind::Directory { children: None }
        } else {
            TreeNodeKind::File
        };
        Self {
            name: entry.name,
            path: entry.path,
            kind,
            is_expanded: false,
        }
    }

    pub fn is_directory(&self) -> bool {
        matches!(self.kind, TreeNodeKind::Directory { .. })
    }

    /// Loaded children; `None` for files and unloaded directories.
    pub fn children(&self) -> Option<&[TreeNode]> {
        match &self.kind {
            TreeNodeKind::Directory {
                children: Some(children),
            } => Some(children),
            _ => None,
        }
    }

    pub fn find(&self, target: &Path) -> Option<&TreeNode> {
        if self.path.as_path() == target {
            return Some(self);
        }
        self.children()?.iter().find_map(|child| child.find(target))
    }

    fn find_mut(&mut self, target: &Path) -> Option<&mut TreeNode> {
        if self.path.as_path() == target {
            return Some(self);
        }
        match &mut self.kind {
            TreeNodeKind::Directory {
                children: Some(children),
            } => children.iter_mut().find_map(|child| child.find_mut(target)),
            _ => None,
        }
    }

    /// Directories whose children are loaded, parents before children,
    /// with their expansion flag.
    fn collect_loaded_dirs(&self, dirs: &mut Vec<(PathKey, bool)>) {
        if let Some(children) = self.children() {
            dirs.push((self.path.clone(), self.is_expanded));
            for child in children {
                child.collect_loaded_dirs(dirs);
            }
        }
    }

    fn collect_expanded_paths(&self, paths: &mut Vec<PathKey>) {
        if self.is_expanded {
            paths.push(self.path.clone());
        }
        for child in self.children().unwrap_or_default() {
            child.collect_expanded_paths(paths);
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tree
// ─────────────────────────────────────────────────────────────────────────────

/// A window's project view: a mirror and the node hierarchy read from it.
#[derive(Debug, Clone)]
pub struct Tree {
    id: TreeId,
    mirror: Mirror,
    root: TreeNode,
    hidden: HiddenPatterns,
}

impl Tree {
    /// Build a tree over `mirror`, listing the root if it is a directory.
    pub fn new(mirror: Mirror, hidden: HiddenPatterns) -> Result<Self> {
        let path = mirror.path().clone();
        let name = path.file_name().unwrap_or_else(|| path.to_string());
        let kind = if mirror.is_directory() {
            TreeNodeKind::Directory { children: None }
        } else {
            TreeNodeKind::File
        };
        let mut tree = Self {
            id: TreeId::next(),
            mirror,
            root: TreeNode {
                name,
                path,
                kind,
                is_expanded: true,
            },
            hidden,
        };
        tree.refresh()?;
        Ok(tree)
    }

    /// Convenience constructor for a directory-backed project tree.
    pub fn for_directory(root: PathKey, hidden: HiddenPatterns) -> Result<Self> {
        Self::new(Mirror::Directory(DirMirror::new(root)), hidden)
    }

    pub fn id(&self) -> TreeId {
        self.id
    }

    pub fn mirror(&self) -> &Mirror {
        &self.mirror
    }

    /// Whether this tree shows a project, i.e. is backed by a directory.
    pub fn is_project(&self) -> bool {
        self.mirror.is_directory()
    }

    pub fn root_path(&self) -> &PathKey {
        self.mirror.path()
    }

    pub fn root(&self) -> &TreeNode {
        &self.root
    }

    /// Re-query the mirror: the root and every loaded directory.
    ///
    /// Collapsed directories with loaded children are re-listed too, so
    /// expanded directories below them stay expanded.
    pub fn refresh(&mut self) -> Result<()> {
        let Some(dir) = self.mirror.as_directory() else {
            return Ok(());
        };
        let mut loaded = Vec::new();
        self.root.collect_loaded_dirs(&mut loaded);
        let children = self.load_children(dir, &self.root.path)?;
        self.root.kind = TreeNodeKind::Directory {
            children: Some(children),
        };

        let root_path = self.root.path.clone();
        for (path, expanded) in loaded.iter().filter(|(p, _)| *p != root_path) {
            // Directories that vanished since the last listing just drop out
            if let Err(e) = self.load(path, *expanded) {
                debug!("Not reloading {}: {}", path, e);
            }
        }
        debug!("Refreshed tree {}", self.root_path());
        Ok(())
    }

    /// Expand the directory at `path`, loading its children.
    ///
    /// Returns `false` if no loaded directory node has that path.
    pub fn expand(&mut self, path: &PathKey) -> Result<bool> {
        self.load(path, true)
    }

    fn load(&mut self, path: &PathKey, expanded: bool) -> Result<bool> {
        let Some(dir) = self.mirror.as_directory().cloned() else {
            return Ok(false);
        };
        let children = match self.root.find(path.as_path()) {
            Some(node) if node.is_directory() => self.load_children(&dir, path)?,
            _ => return Ok(false),
        };
        if let Some(node) = self.root.find_mut(path.as_path()) {
            node.kind = TreeNodeKind::Directory {
                children: Some(children),
            };
            node.is_expanded = expanded;
        }
        Ok(true)
    }

    /// Collapse the directory at `path`. Its loaded children are kept.
    pub fn collapse(&mut self, path: &PathKey) -> bool {
        match self.root.find_mut(path.as_path()) {
            Some(node) if node.is_directory() => {
                node.is_expanded = false;
                true
            }
            _ => false,
        }
    }

    /// All expanded directories, root included.
    pub fn expanded_paths(&self) -> Vec<PathKey> {
        let mut paths = Vec::new();
        self.root.collect_expanded_paths(&mut paths);
        paths
    }

    /// Every visible file below the root.
    pub fn all_files(&self) -> Vec<PathKey> {
        match self.mirror.as_directory() {
            Some(dir) => dir.walk_files(|name| self.hidden.hides(name)),
            None => vec![self.root_path().clone()],
        }
    }

    fn load_children(&self, dir: &DirMirror, path: &PathKey) -> Result<Vec<TreeNode>> {
        Ok(dir
            .list_dir(path)?
            .into_iter()
            .filter(|entry| !self.hidden.hides(&entry.name))
            .map(TreeNode::from_entry)
            .collect())
    }
}

impl PartialEq for Tree {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
