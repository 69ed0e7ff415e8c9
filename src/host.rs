//! Contracts of the host application's collaborators.
//!
//! Window/tab rendering, dialogs and the document buffers themselves live
//! in the host. The project layer only talks to them through these traits,
//! with the window and document passed in explicitly.

use crate::mirror::Mirror;
use crate::tree::Tree;
use std::fmt;
use std::path::{Path, PathBuf};

/// Opaque identity of a host window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WindowId(pub u64);

/// Opaque identity of a document-bearing tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentId(pub u64);

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "window#{}", self.0)
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "document#{}", self.0)
    }
}

/// The per-window surface that renders project trees.
pub trait TreeSurface {
    fn attach_tree(&mut self, window: WindowId, tree: &Tree);
    fn detach_tree(&mut self, window: WindowId, tree: &Tree);
}

/// Windows, tabs and document buffers of the host.
pub trait DocumentHost {
    /// All open windows.
    fn windows(&self) -> Vec<WindowId>;

    /// The document focused in `window`, if any.
    fn focused_document(&self, window: WindowId) -> Option<DocumentId>;

    /// Every open document across every window, with its mirror.
    fn documents(&self) -> Vec<(DocumentId, Option<&Mirror>)>;

    fn mirror(&self, document: DocumentId) -> Option<&Mirror>;

    /// Current in-memory content of a document.
    fn contents(&self, document: DocumentId) -> Option<String>;

    /// Open a new document in `window` bound to `mirror`.
    fn new_document(&mut self, window: WindowId, mirror: Mirror, contents: String) -> DocumentId;

    /// Replace a document's mirror, dropping the previous one.
    fn set_mirror(&mut self, document: DocumentId, mirror: Mirror);

    fn focus(&mut self, document: DocumentId);
}

/// Everything the project layer needs from the host.
pub trait Workbench: TreeSurface + DocumentHost {}

impl<T: TreeSurface + DocumentHost> Workbench for T {}

/// Modal path pickers. `None` means the user cancelled.
pub trait Dialogs {
    fn prompt_open_file(&mut self, start_dir: &Path) -> Option<PathBuf>;
    fn prompt_save_file(&mut self, start_dir: &Path) -> Option<PathBuf>;
    fn prompt_open_directory(&mut self, start_dir: &Path) -> Option<PathBuf>;
}
