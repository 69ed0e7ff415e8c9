//! project-tree - the project and file-tree layer of a text editor
//!
//! Opens directories as per-window project trees, opens and saves files
//! through on-disk mirrors, deduplicates documents by canonical path and
//! tracks recently used files. The editor plugs in through the traits in
//! [`host`].

pub mod config;
pub mod error;
pub mod finder;
pub mod host;
pub mod memory;
pub mod mirror;
pub mod mru;
pub mod path_key;
pub mod project;
pub mod resolver;
pub mod tree;
pub mod trees;
pub mod watcher;

pub use error::{Error, Result, ResultExt};
pub use host::{Dialogs, DocumentHost, DocumentId, TreeSurface, WindowId, Workbench};
pub use memory::MemoryWorkbench;
pub use mirror::{DirMirror, FileMirror, Mirror};
pub use mru::MruTracker;
pub use path_key::PathKey;
pub use project::{Opened, Project};
pub use tree::{HiddenPatterns, Tree, TreeNode};
pub use trees::TreeAssociations;
