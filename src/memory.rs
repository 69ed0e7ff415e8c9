//! In-memory host implementation.
//!
//! Keeps windows, documents and attached trees in plain maps. Used by the
//! headless binary and by tests; real editors implement the `host` traits
//! over their own window and buffer types.

use crate::host::{DocumentHost, DocumentId, TreeSurface, WindowId};
use crate::mirror::Mirror;
use crate::tree::{Tree, TreeId};
use log::debug;
use std::collections::{BTreeMap, HashMap};

/// A document buffer held by [`MemoryWorkbench`].
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryDocument {
    pub window: WindowId,
    pub mirror: Option<Mirror>,
    pub contents: String,
}

/// Windows, documents and tree attachments kept in memory.
#[derive(Debug, Default)]
pub struct MemoryWorkbench {
    windows: Vec<WindowId>,
    /// Ordered by id, i.e. by creation
    documents: BTreeMap<DocumentId, MemoryDocument>,
    focused: HashMap<WindowId, DocumentId>,
    attached: HashMap<WindowId, Vec<TreeId>>,
    next_window: u64,
    next_document: u64,
}

impl MemoryWorkbench {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_window(&mut self) -> WindowId {
        self.next_window += 1;
        let window = WindowId(self.next_window);
        self.windows.push(window);
        window
    }

    /// Close `window` together with its documents and attached trees.
    pub fn close_window(&mut self, window: WindowId) {
        self.windows.retain(|w| *w != window);
        self.documents.retain(|_, doc| doc.window != window);
        self.focused.remove(&window);
        self.attached.remove(&window);
        debug!("Closed {}", window);
    }

    /// Open an untitled, focused document in `window`.
    pub fn new_untitled(&mut self, window: WindowId, contents: impl Into<String>) -> DocumentId {
        let document = self.insert(window, None, contents.into());
        self.focus(document);
        document
    }

    pub fn document(&self, document: DocumentId) -> Option<&MemoryDocument> {
        self.documents.get(&document)
    }

    pub fn set_contents(&mut self, document: DocumentId, contents: impl Into<String>) -> bool {
        match self.documents.get_mut(&document) {
            Some(doc) => {
                doc.contents = contents.into();
                true
            }
            None => false,
        }
    }

    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    /// Trees currently rendered in `window`, in attach order.
    pub fn attached_trees(&self, window: WindowId) -> &[TreeId] {
        self.attached.get(&window).map(Vec::as_slice).unwrap_or(&[])
    }

    fn insert(&mut self, window: WindowId, mirror: Option<Mirror>, contents: String) -> DocumentId {
        self.next_document += 1;
        let document = DocumentId(self.next_document);
        self.documents.insert(
            document,
            MemoryDocument {
                window,
                mirror,
                contents,
            },
        );
        document
    }
}

impl TreeSurface for MemoryWorkbench {
    fn attach_tree(&mut self, window: WindowId, tree: &Tree) {
        self.attached.entry(window).or_default().push(tree.id());
    }

    fn detach_tree(&mut self, window: WindowId, tree: &Tree) {
        if let Some(trees) = self.attached.get_mut(&window) {
            trees.retain(|id| *id != tree.id());
        }
    }
}

impl DocumentHost for MemoryWorkbench {
    fn windows(&self) -> Vec<WindowId> {
        self.windows.clone()
    }

    fn focused_document(&self, window: WindowId) -> Option<DocumentId> {
        self.focused.get(&window).copied()
    }

    fn documents(&self) -> Vec<(DocumentId, Option<&Mirror>)> {
        self.documents
            .iter()
            .map(|(id, doc)| (*id, doc.mirror.as_ref()))
            .collect()
    }

    fn mirror(&self, document: DocumentId) -> Option<&Mirror> {
        self.documents.get(&document)?.mirror.as_ref()
    }

    fn contents(&self, document: DocumentId) -> Option<String> {
        self.documents.get(&document).map(|doc| doc.contents.clone())
    }

    fn new_document(&mut self, window: WindowId, mirror: Mirror, contents: String) -> DocumentId {
        let document = self.insert(window, Some(mirror), contents);
        debug!("Created {} in {}", document, window);
        document
    }

    fn set_mirror(&mut self, document: DocumentId, mirror: Mirror) {
        if let Some(doc) = self.documents.get_mut(&document) {
            doc.mirror = Some(mirror);
        }
    }

    fn focus(&mut self, document: DocumentId) {
        if let Some(doc) = self.documents.get(&document) {
            self.focused.insert(doc.window, document);
        }
    }
}
