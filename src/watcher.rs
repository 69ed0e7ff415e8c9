//! File system watching for open project trees.
//!
//! Watcher threads never touch project state. They only push events into a
//! channel, which the owner drains from the UI thread.

use crate::error::{Error, Result};
use crate::path_key::PathKey;
use crate::tree::HiddenPatterns;
use notify::event::{ModifyKind, RenameMode};
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Component, Path, PathBuf};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::time::Duration;

/// File system events that matter to a tree.
#[derive(Debug, Clone, PartialEq)]
pub enum TreeEvent {
    Created(PathBuf),
    Modified(PathBuf),
    Removed(PathBuf),
    /// The watcher encountered an error
    Error(String),
}

impl TreeEvent {
    /// Whether the event can change what a tree lists.
    pub fn changes_structure(&self) -> bool {
        matches!(self, TreeEvent::Created(_) | TreeEvent::Removed(_))
    }

    fn path(&self) -> Option<&Path> {
        match self {
            TreeEvent::Created(p) | TreeEvent::Modified(p) | TreeEvent::Removed(p) => Some(p),
            TreeEvent::Error(_) => None,
        }
    }
}

/// Recursive watcher over one tree root.
#[derive(Debug)]
pub struct TreeWatcher {
    _watcher: RecommendedWatcher,
    receiver: Receiver<TreeEvent>,
    root: PathKey,
}

impl TreeWatcher {
    /// Start watching `root` recursively.
    pub fn new(root: PathKey) -> Result<Self> {
        let (tx, rx) = channel();

        let mut watcher = RecommendedWatcher::new(
            move |result: std::result::Result<Event, notify::Error>| {
                Self::handle_event(result, &tx);
            },
            Config::default().with_poll_interval(Duration::from_millis(500)),
        )
        .map_err(|e| Error::Watch {
            path: root.as_path().to_path_buf(),
            message: format!("Failed to create file watcher: {}", e),
        })?;

        watcher
            .watch(root.as_path(), RecursiveMode::Recursive)
            .map_err(|e| Error::Watch {
                path: root.as_path().to_path_buf(),
                message: e.to_string(),
            })?;

        Ok(Self {
            _watcher: watcher,
            receiver: rx,
            root,
        })
    }

    fn handle_event(result: std::result::Result<Event, notify::Error>, tx: &Sender<TreeEvent>) {
        match result {
            Ok(event) => {
                for evt in translate(event) {
                    let _ = tx.send(evt);
                }
            }
            Err(e) => {
                let _ = tx.send(TreeEvent::Error(e.to_string()));
            }
        }
    }

    /// Drain pending events without blocking.
    pub fn poll_events(&self) -> Vec<TreeEvent> {
        self.receiver.try_iter().collect()
    }

    pub fn root(&self) -> &PathKey {
        &self.root
    }
}

/// Map a notify event onto tree events.
///
/// Renames count as a removal of the old name and a creation of the new
/// one, so they change structure like any other create or delete.
fn translate(event: Event) -> Vec<TreeEvent> {
    match event.kind {
        EventKind::Create(_) => event.paths.into_iter().map(TreeEvent::Created).collect(),
        EventKind::Remove(_) => event.paths.into_iter().map(TreeEvent::Removed).collect(),
        EventKind::Modify(ModifyKind::Name(mode)) => {
            let last = event.paths.len().saturating_sub(1);
            event
                .paths
                .into_iter()
                .enumerate()
                .map(|(index, path)| match mode {
                    RenameMode::From => TreeEvent::Removed(path),
                    RenameMode::To => TreeEvent::Created(path),
                    RenameMode::Both if index < last => TreeEvent::Removed(path),
                    RenameMode::Both => TreeEvent::Created(path),
                    // Backends that cannot tell the sides apart
                    _ if path.exists() => TreeEvent::Created(path),
                    _ => TreeEvent::Removed(path),
                })
                .collect()
        }
        EventKind::Modify(_) => event.paths.into_iter().map(TreeEvent::Modified).collect(),
        _ => Vec::new(),
    }
}

/// Drop events for hidden paths below `root`. Errors always pass.
///
/// Only the components under `root` are checked, so a root that itself
/// sits inside a dot directory still reports its events.
pub fn filter_events(events: Vec<TreeEvent>, root: &Path, hidden: &HiddenPatterns) -> Vec<TreeEvent> {
    events
        .into_iter()
        .filter(|event| {
            let Some(path) = event.path() else {
                return true;
            };
            let relative = path.strip_prefix(root).unwrap_or(path);
            !relative.components().any(|component| match component {
                Component::Normal(name) => hidden.hides(&name.to_string_lossy()),
                _ => false,
            })
        })
        .collect()
}
