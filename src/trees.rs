//! Window → project tree associations.
//!
//! Each window is either without a project or shows exactly one tree.
//! Whether any window shows a project is published through an
//! [`AvailabilitySignal`] that command enablement can poll or subscribe to.

use crate::error::Result;
use crate::host::{TreeSurface, WindowId};
use crate::tree::Tree;
use log::{debug, info};
use std::collections::HashMap;
use std::fmt;

// ─────────────────────────────────────────────────────────────────────────────
// Availability Signal
// ─────────────────────────────────────────────────────────────────────────────

type Listener = Box<dyn FnMut(bool)>;

/// Derived boolean: "a project is open in some window".
///
/// Listeners run only when the value actually changes.
#[derive(Default)]
pub struct AvailabilitySignal {
    value: bool,
    listeners: Vec<Listener>,
}

impl AvailabilitySignal {
    pub fn get(&self) -> bool {
        self.value
    }

    /// Register a listener called with the new value on every change.
    pub fn subscribe(&mut self, listener: impl FnMut(bool) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    fn set(&mut self, value: bool) {
        if self.value == value {
            return;
        }
        self.value = value;
        debug!("Project availability changed to {}", value);
        for listener in &mut self.listeners {
            listener(value);
        }
    }
}

impl fmt::Debug for AvailabilitySignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AvailabilitySignal")
            .field("value", &self.value)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tree Associations
// ─────────────────────────────────────────────────────────────────────────────

/// At most one tree per window.
#[derive(Debug, Default)]
pub struct TreeAssociations {
    trees: HashMap<WindowId, Tree>,
    signal: AvailabilitySignal,
}

impl TreeAssociations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show `tree` in `window`, replacing any tree already there.
    ///
    /// The new tree is attached before the old one is detached, so the
    /// surface never sees the window without a tree. Returns the replaced
    /// tree.
    pub fn open_tree<S>(&mut self, surface: &mut S, window: WindowId, tree: Tree) -> Option<Tree>
    where
        S: TreeSurface + ?Sized,
    {
        info!("Opening tree {} in {}", tree.root_path(), window);
        surface.attach_tree(window, &tree);
        let replaced = self.trees.insert(window, tree);
        if let Some(old) = &replaced {
            surface.detach_tree(window, old);
            debug!("Detached previous tree {} from {}", old.root_path(), window);
        }
        self.recompute();
        replaced
    }

    /// Detach and forget the tree of `window`.
    ///
    /// A window without a tree is left alone and `None` is returned.
    pub fn close_tree<S>(&mut self, surface: &mut S, window: WindowId) -> Option<Tree>
    where
        S: TreeSurface + ?Sized,
    {
        let Some(tree) = self.trees.remove(&window) else {
            debug!("No tree to close in {}", window);
            return None;
        };
        surface.detach_tree(window, &tree);
        info!("Closed tree {} in {}", tree.root_path(), window);
        self.recompute();
        Some(tree)
    }

    /// Re-list the tree of `window`. `Ok(false)` if the window has none.
    pub fn refresh_tree(&mut self, window: WindowId) -> Result<bool> {
        match self.trees.get_mut(&window) {
            Some(tree) => {
                tree.refresh()?;
                Ok(true)
            }
            None => {
                debug!("No tree to refresh in {}", window);
                Ok(false)
            }
        }
    }

    /// Whether any window shows a directory-backed tree.
    pub fn has_open_project(&self) -> bool {
        self.trees.values().any(Tree::is_project)
    }

    pub fn tree(&self, window: WindowId) -> Option<&Tree> {
        self.trees.get(&window)
    }

    pub fn tree_mut(&mut self, window: WindowId) -> Option<&mut Tree> {
        self.trees.get_mut(&window)
    }

    /// Windows that currently show a tree, in no particular order.
    pub fn windows_with_trees(&self) -> Vec<WindowId> {
        self.trees.keys().copied().collect()
    }

    pub fn signal(&self) -> &AvailabilitySignal {
        &self.signal
    }

    pub fn signal_mut(&mut self) -> &mut AvailabilitySignal {
        &mut self.signal
    }

    fn recompute(&mut self) {
        let open = self.has_open_project();
        self.signal.set(open);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
