//! The project facade used by command handlers.
//!
//! `Project` owns all project-layer state: the window → tree associations,
//! the MRU list, settings and dialog storage. It is created once at startup
//! and handed explicitly to every command; the host's windows and documents
//! are passed in per call.

use crate::config::{Settings, Storage};
use crate::error::{Error, Result};
use crate::finder::{FileFinder, FindResult};
use crate::host::{Dialogs, DocumentId, WindowId, Workbench};
use crate::mirror::{FileMirror, Mirror};
use crate::mru::MruTracker;
use crate::path_key::PathKey;
use crate::resolver::find_open;
use crate::tree::Tree;
use crate::trees::TreeAssociations;
use crate::watcher::{filter_events, TreeEvent, TreeWatcher};
use log::{debug, info, warn};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Name of the storage file holding dialog state.
pub const STORAGE_NAME: &str = "project_plugin";

/// Storage key of the directory last chosen in a dialog.
pub const LAST_DIR_KEY: &str = "last_dir";

/// What `open_path` ended up opening.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opened {
    Tree,
    Document(DocumentId),
}

/// Project-layer coordinator.
#[derive(Debug)]
pub struct Project {
    settings: Settings,
    trees: TreeAssociations,
    mru: MruTracker,
    storage: Storage,
    finder: FileFinder,
    watchers: HashMap<WindowId, TreeWatcher>,
}

impl Project {
    pub fn new(settings: Settings, storage: Storage) -> Self {
        let finder = FileFinder::new(settings.max_find_results, settings.recent_boost);
        Self {
            settings,
            trees: TreeAssociations::new(),
            mru: MruTracker::new(),
            storage,
            finder,
            watchers: HashMap::new(),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn trees(&self) -> &TreeAssociations {
        &self.trees
    }

    /// Mutable access, e.g. to subscribe to the availability signal.
    pub fn trees_mut(&mut self) -> &mut TreeAssociations {
        &mut self.trees
    }

    pub fn mru(&self) -> &MruTracker {
        &self.mru
    }

    /// Recently used files, most recent first.
    pub fn most_recent_used_files(&self) -> Vec<PathKey> {
        self.mru.snapshot()
    }

    /// Whether any window shows a project; drives project command enablement.
    pub fn has_open_project(&self) -> bool {
        self.trees.has_open_project()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Startup
    // ─────────────────────────────────────────────────────────────────────────

    /// Open every path given on the command line in `window`.
    ///
    /// Directories become trees, files become documents. Paths that are
    /// neither, or fail to open, are logged and skipped. Returns how many
    /// paths were opened.
    pub fn start<W, I, P>(&mut self, host: &mut W, window: WindowId, paths: I) -> usize
    where
        W: Workbench + ?Sized,
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut opened = 0;
        for path in paths {
            let path = path.as_ref();
            match self.open_path(host, window, path) {
                Ok(_) => opened += 1,
                Err(e) => warn!("Skipping startup path {}: {}", path.display(), e),
            }
        }
        opened
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Opening
    // ─────────────────────────────────────────────────────────────────────────

    /// Open a directory as a tree or a file as a document.
    pub fn open_path<W>(&mut self, host: &mut W, window: WindowId, raw: impl AsRef<Path>) -> Result<Opened>
    where
        W: Workbench + ?Sized,
    {
        let raw = raw.as_ref();
        let path = PathKey::canonicalize(raw)?;
        if path.is_dir() {
            self.open_directory(host, window, path)?;
            Ok(Opened::Tree)
        } else if path.is_file() {
            self.open_file(host, window, path).map(Opened::Document)
        } else {
            Err(Error::invalid_path(raw))
        }
    }

    /// Show the directory `raw` as the project tree of `window`.
    pub fn open_directory<W>(&mut self, host: &mut W, window: WindowId, raw: impl AsRef<Path>) -> Result<()>
    where
        W: Workbench + ?Sized,
    {
        let raw = raw.as_ref();
        let root = PathKey::canonicalize(raw)?;
        if !root.is_dir() {
            return Err(Error::invalid_path(raw));
        }

        let tree = Tree::for_directory(root, self.settings.hidden())?;
        self.trees.open_tree(host, window, tree);
        self.watchers.remove(&window);
        if self.settings.watch_trees {
            if let Err(e) = self.watch_tree(window) {
                warn!("{}", e);
            }
        }
        Ok(())
    }

    /// Open the file `raw` in `window`, or focus it if it is already open
    /// anywhere.
    ///
    /// The MRU list records the move from the focused document's file.
    pub fn open_file<W>(&mut self, host: &mut W, window: WindowId, raw: impl AsRef<Path>) -> Result<DocumentId>
    where
        W: Workbench + ?Sized,
    {
        let raw = raw.as_ref();
        let path = PathKey::canonicalize(raw)?;
        if path.is_dir() {
            return Err(Error::invalid_path(raw));
        }

        let current = host
            .focused_document(window)
            .and_then(|doc| host.mirror(doc))
            .and_then(Mirror::file_path)
            .cloned();

        let open = find_open(&path, host.documents());
        if let Some(existing) = open {
            self.mru.record_access(current.as_ref(), path);
            host.focus(existing);
            info!("File already open, focusing {}", existing);
            return Ok(existing);
        }

        let mirror = FileMirror::new(path.clone());
        let contents = mirror.read()?;
        self.mru.record_access(current.as_ref(), path.clone());

        let document = host.new_document(window, Mirror::File(mirror), contents);
        host.focus(document);
        info!("Opened {} as {}", path, document);
        Ok(document)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Saving
    // ─────────────────────────────────────────────────────────────────────────

    /// Save the focused document of `window`.
    ///
    /// Documents without a file mirror go through save-as with a prompted
    /// path. Returns `false` if that prompt was cancelled.
    pub fn save<W, D>(&mut self, host: &mut W, dialogs: &mut D, window: WindowId) -> Result<bool>
    where
        W: Workbench + ?Sized,
        D: Dialogs + ?Sized,
    {
        let document = host
            .focused_document(window)
            .ok_or(Error::NoFocusedDocument)?;

        match host.mirror(document).and_then(Mirror::as_file).cloned() {
            Some(mirror) => {
                let contents = host.contents(document).ok_or(Error::NoFocusedDocument)?;
                mirror.commit(contents.as_bytes())?;
                Ok(true)
            }
            None => self.prompt_save_as(host, dialogs, window),
        }
    }

    /// Write the focused document of `window` to `raw` and rebind it there.
    ///
    /// On a failed write the document keeps its previous mirror.
    pub fn save_as<W>(&mut self, host: &mut W, window: WindowId, raw: impl AsRef<Path>) -> Result<()>
    where
        W: Workbench + ?Sized,
    {
        let document = host
            .focused_document(window)
            .ok_or(Error::NoFocusedDocument)?;
        let path = PathKey::canonicalize(raw)?;
        let contents = host.contents(document).ok_or(Error::NoFocusedDocument)?;

        let mirror = FileMirror::new(path);
        mirror.commit(contents.as_bytes())?;
        info!("{} is now bound to {}", document, mirror.path());
        host.set_mirror(document, Mirror::File(mirror));

        // The tree may need to show the new file
        if let Err(e) = self.refresh_tree(window) {
            warn!("Tree refresh after save-as failed: {}", e);
        }
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Tree Commands
    // ─────────────────────────────────────────────────────────────────────────

    /// Close the tree of `window`. Returns `false` if there was none.
    pub fn close_tree<W>(&mut self, host: &mut W, window: WindowId) -> bool
    where
        W: Workbench + ?Sized,
    {
        self.watchers.remove(&window);
        self.trees.close_tree(host, window).is_some()
    }

    /// Re-list the tree of `window`. `Ok(false)` if there is none.
    pub fn refresh_tree(&mut self, window: WindowId) -> Result<bool> {
        self.trees.refresh_tree(window)
    }

    /// Fuzzy-find files in the tree of `window`. Empty without a tree.
    pub fn find_files(&self, window: WindowId, query: &str) -> Vec<FindResult> {
        let Some(tree) = self.trees.tree(window) else {
            debug!("Find file without a tree in {}", window);
            return Vec::new();
        };
        let files = tree.all_files();
        let recent = self.mru.snapshot();
        self.finder.find(query, tree.root_path(), &files, &recent)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Prompting Commands
    // ─────────────────────────────────────────────────────────────────────────

    /// Directory dialogs start in: the last chosen one, else the working
    /// directory.
    pub fn filter_path(&self) -> PathBuf {
        match self.storage.get(LAST_DIR_KEY) {
            Some(dir) => PathBuf::from(dir),
            None => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
        }
    }

    /// Ask for a file and open it. `Ok(None)` if cancelled.
    pub fn prompt_open_file<W, D>(
        &mut self,
        host: &mut W,
        dialogs: &mut D,
        window: WindowId,
    ) -> Result<Option<DocumentId>>
    where
        W: Workbench + ?Sized,
        D: Dialogs + ?Sized,
    {
        let Some(path) = dialogs.prompt_open_file(&self.filter_path()) else {
            return Ok(None);
        };
        self.remember_dir(&path);
        self.open_file(host, window, path).map(Some)
    }

    /// Ask for a target path and save the focused document there.
    /// `Ok(false)` if cancelled.
    pub fn prompt_save_as<W, D>(&mut self, host: &mut W, dialogs: &mut D, window: WindowId) -> Result<bool>
    where
        W: Workbench + ?Sized,
        D: Dialogs + ?Sized,
    {
        let Some(path) = dialogs.prompt_save_file(&self.filter_path()) else {
            return Ok(false);
        };
        self.remember_dir(&path);
        self.save_as(host, window, path)?;
        Ok(true)
    }

    /// Ask for a directory and open it as the tree of `window`.
    /// `Ok(false)` if cancelled.
    pub fn prompt_open_directory<W, D>(
        &mut self,
        host: &mut W,
        dialogs: &mut D,
        window: WindowId,
    ) -> Result<bool>
    where
        W: Workbench + ?Sized,
        D: Dialogs + ?Sized,
    {
        let Some(path) = dialogs.prompt_open_directory(&self.filter_path()) else {
            return Ok(false);
        };
        self.remember_dir(&path);
        self.open_directory(host, window, path)?;
        Ok(true)
    }

    /// Store the directory containing `path` as the next dialog start.
    fn remember_dir(&mut self, path: &Path) {
        let absolute = match PathKey::canonicalize(path) {
            Ok(key) => key.into_path_buf(),
            Err(_) => path.to_path_buf(),
        };
        let Some(dir) = absolute.parent() else {
            return;
        };
        if let Err(e) = self
            .storage
            .set(LAST_DIR_KEY, dir.to_string_lossy().into_owned())
        {
            warn!("Failed to remember last directory: {}", e);
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Watching
    // ─────────────────────────────────────────────────────────────────────────

    /// Start watching the tree root of `window` for external changes.
    pub fn watch_tree(&mut self, window: WindowId) -> Result<()> {
        let root = self
            .trees
            .tree(window)
            .ok_or(Error::NoActiveTree)?
            .root_path()
            .clone();
        let watcher = TreeWatcher::new(root)?;
        info!("Watching {} for {}", watcher.root(), window);
        self.watchers.insert(window, watcher);
        Ok(())
    }

    /// Drain watcher events and refresh trees whose listing changed.
    ///
    /// Files removed or renamed away also leave the MRU list. Call from the
    /// UI thread. Returns the refreshed windows.
    pub fn poll_watchers(&mut self) -> Vec<WindowId> {
        let hidden = self.settings.hidden();
        let mut refreshed = Vec::new();

        for (window, watcher) in &self.watchers {
            let events = filter_events(watcher.poll_events(), watcher.root().as_path(), &hidden);
            for event in &events {
                match event {
                    TreeEvent::Error(message) => {
                        warn!("Watcher for {} reported: {}", window, message);
                    }
                    TreeEvent::Removed(path) => {
                        if let Ok(key) = PathKey::canonicalize(path) {
                            if self.mru.forget(&key) {
                                debug!("{} was removed, dropped from MRU", key);
                            }
                        }
                    }
                    _ => {}
                }
            }
            if !events.iter().any(TreeEvent::changes_structure) {
                continue;
            }
            match self.trees.refresh_tree(*window) {
                Ok(true) => refreshed.push(*window),
                Ok(false) => {}
                Err(e) => warn!("Refreshing {} after external change failed: {}", window, e),
            }
        }
        refreshed
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Window Lifecycle
    // ─────────────────────────────────────────────────────────────────────────

    /// Drop the trees and watchers of windows the host no longer has.
    ///
    /// Returns how many trees were closed.
    pub fn forget_closed_windows<W>(&mut self, host: &mut W) -> usize
    where
        W: Workbench + ?Sized,
    {
        let open = host.windows();
        let mut closed = 0;
        for window in self.trees.windows_with_trees() {
            if open.contains(&window) {
                continue;
            }
            info!("{} went away, dropping its tree", window);
            if self.close_tree(host, window) {
                closed += 1;
            }
        }
        closed
    }
}

impl Default for Project {
    fn default() -> Self {
        Self::new(Settings::default(), Storage::in_memory())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryWorkbench;
    use crate::host::DocumentHost;
    use std::fs;
    use tempfile::TempDir;

    /// Dialogs answering from a fixed script.
    #[derive(Default)]
    struct ScriptedDialogs {
        answer: Option<PathBuf>,
        asked_in: Vec<PathBuf>,
    }

    impl ScriptedDialogs {
        fn answering(path: impl Into<PathBuf>) -> Self {
            Self {
                answer: Some(path.into()),
                asked_in: Vec::new(),
            }
        }
    }

    impl Dialogs for ScriptedDialogs {
        fn prompt_open_file(&mut self, start_dir: &Path) -> Option<PathBuf> {
            self.asked_in.push(start_dir.to_path_buf());
            self.answer.take()
        }

        fn prompt_save_file(&mut self, start_dir: &Path) -> Option<PathBuf> {
            self.asked_in.push(start_dir.to_path_buf());
            self.answer.take()
        }

        fn prompt_open_directory(&mut self, start_dir: &Path) -> Option<PathBuf> {
            self.asked_in.push(start_dir.to_path_buf());
            self.answer.take()
        }
    }

    struct Env {
        temp: TempDir,
        bench: MemoryWorkbench,
        project: Project,
        w1: WindowId,
        w2: WindowId,
    }

    impl Env {
        fn new() -> Self {
            let temp = TempDir::new().unwrap();
            fs::create_dir_all(temp.path().join("proj").join("src")).unwrap();
            fs::write(temp.path().join("proj").join("a.txt"), "alpha").unwrap();
            fs::write(temp.path().join("proj").join("b.txt"), "beta").unwrap();
            fs::write(temp.path().join("proj").join("src").join("lib.rs"), "").unwrap();
            let mut bench = MemoryWorkbench::new();
            let w1 = bench.add_window();
            let w2 = bench.add_window();
            Self {
                temp,
                bench,
                project: Project::default(),
                w1,
                w2,
            }
        }

        fn path(&self, rel: &str) -> PathBuf {
            self.temp.path().join(rel)
        }

        fn key(&self, rel: &str) -> PathKey {
            PathKey::canonicalize(self.path(rel)).unwrap()
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Open Tests
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_open_path_directory_creates_tree_only() {
        let mut env = Env::new();
        let opened = env
            .project
            .open_path(&mut env.bench, env.w1, env.temp.path().join("proj"))
            .unwrap();

        assert_eq!(opened, Opened::Tree);
        assert_eq!(env.bench.document_count(), 0);
        assert_eq!(env.bench.attached_trees(env.w1).len(), 1);
        assert!(env.project.has_open_project());
        assert!(env.project.most_recent_used_files().is_empty());
    }

    #[test]
    fn test_open_path_file_creates_document_only() {
        let mut env = Env::new();
        let opened = env
            .project
            .open_path(&mut env.bench, env.w1, env.temp.path().join("proj/a.txt"))
            .unwrap();

        let Opened::Document(doc) = opened else {
            panic!("Expected a document");
        };
        assert_eq!(env.bench.contents(doc).as_deref(), Some("alpha"));
        assert!(env.bench.attached_trees(env.w1).is_empty());
        assert!(!env.project.has_open_project());
    }

    #[test]
    fn test_open_path_missing_is_invalid_and_mutates_nothing() {
        let mut env = Env::new();
        let result = env
            .project
            .open_path(&mut env.bench, env.w1, env.temp.path().join("proj/missing.txt"));

        assert!(matches!(result, Err(Error::InvalidPath { .. })));
        assert_eq!(env.bench.document_count(), 0);
        assert!(env.project.mru().is_empty());
    }

    #[test]
    fn test_same_file_from_two_windows_shares_one_document() {
        let mut env = Env::new();
        let first = env
            .project
            .open_file(&mut env.bench, env.w1, env.temp.path().join("proj/a.txt"))
            .unwrap();
        let second = env
            .project
            .open_file(&mut env.bench, env.w2, env.temp.path().join("proj/./src/../a.txt"))
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(env.bench.document_count(), 1);
        assert_eq!(env.bench.focused_document(env.w1), Some(first));
    }

    #[test]
    fn test_open_file_records_mru_from_focused_document() {
        let mut env = Env::new();
        let w = env.w1;
        env.project
            .open_file(&mut env.bench, w, env.temp.path().join("proj/a.txt"))
            .unwrap();
        env.project
            .open_file(&mut env.bench, w, env.temp.path().join("proj/b.txt"))
            .unwrap();
        // Reopening the focused file changes nothing
        env.project
            .open_file(&mut env.bench, w, env.temp.path().join("proj/b.txt"))
            .unwrap();

        assert_eq!(
            env.project.most_recent_used_files(),
            vec![env.key("proj/b.txt"), env.key("proj/a.txt")]
        );
    }

    #[test]
    fn test_open_file_rejects_directories() {
        let mut env = Env::new();
        let result = env
            .project
            .open_file(&mut env.bench, env.w1, env.temp.path().join("proj/src"));
        assert!(matches!(result, Err(Error::InvalidPath { .. })));
    }

    #[test]
    fn test_open_new_file_reads_empty() {
        let mut env = Env::new();
        let doc = env
            .project
            .open_file(&mut env.bench, env.w1, env.temp.path().join("proj/new.txt"))
            .unwrap();
        assert_eq!(env.bench.contents(doc).as_deref(), Some(""));
    }

    #[test]
    fn test_start_opens_directories_and_files() {
        let mut env = Env::new();
        let args = vec![
            env.path("proj"),
            env.path("proj/a.txt"),
            env.path("nowhere/at/all"),
        ];
        let opened = env.project.start(&mut env.bench, env.w1, args);

        assert_eq!(opened, 2);
        assert!(env.project.has_open_project());
        assert_eq!(env.bench.document_count(), 1);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Save Tests
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_save_commits_focused_document() {
        let mut env = Env::new();
        let doc = env
            .project
            .open_file(&mut env.bench, env.w1, env.temp.path().join("proj/a.txt"))
            .unwrap();
        env.bench.set_contents(doc, "changed");

        let mut dialogs = ScriptedDialogs::default();
        assert!(env.project.save(&mut env.bench, &mut dialogs, env.w1).unwrap());
        assert_eq!(fs::read_to_string(env.path("proj/a.txt")).unwrap(), "changed");
        assert!(dialogs.asked_in.is_empty());
    }

    #[test]
    fn test_save_untitled_prompts_for_path() {
        let mut env = Env::new();
        let doc = env.bench.new_untitled(env.w1, "draft");
        let target = env.path("proj/draft.txt");
        let mut dialogs = ScriptedDialogs::answering(&target);

        assert!(env.project.save(&mut env.bench, &mut dialogs, env.w1).unwrap());
        assert_eq!(fs::read_to_string(&target).unwrap(), "draft");
        assert_eq!(
            env.bench.mirror(doc).and_then(Mirror::file_path),
            Some(&env.key("proj/draft.txt"))
        );

        // Cancelled prompt saves nothing
        env.bench.new_untitled(env.w1, "other");
        assert!(!env.project.save(&mut env.bench, &mut dialogs, env.w1).unwrap());
    }

    #[test]
    fn test_save_without_focused_document() {
        let mut env = Env::new();
        let mut dialogs = ScriptedDialogs::default();
        assert!(matches!(
            env.project.save(&mut env.bench, &mut dialogs, env.w1),
            Err(Error::NoFocusedDocument)
        ));
    }

    #[test]
    fn test_save_as_rebinds_and_refreshes_tree() {
        let mut env = Env::new();
        env.project
            .open_directory(&mut env.bench, env.w1, env.temp.path().join("proj"))
            .unwrap();
        let doc = env
            .project
            .open_file(&mut env.bench, env.w1, env.temp.path().join("proj/a.txt"))
            .unwrap();

        env.project
            .save_as(&mut env.bench, env.w1, env.temp.path().join("proj/copy.txt"))
            .unwrap();

        assert_eq!(
            env.bench.mirror(doc).and_then(Mirror::file_path),
            Some(&env.key("proj/copy.txt"))
        );
        assert_eq!(fs::read_to_string(env.path("proj/copy.txt")).unwrap(), "alpha");
        let tree = env.project.trees().tree(env.w1).unwrap();
        assert!(tree
            .root()
            .children()
            .unwrap()
            .iter()
            .any(|n| n.name == "copy.txt"));
    }

    #[test]
    fn test_save_as_failure_keeps_old_mirror() {
        let mut env = Env::new();
        let doc = env
            .project
            .open_file(&mut env.bench, env.w1, env.temp.path().join("proj/a.txt"))
            .unwrap();
        let before = env.bench.mirror(doc).cloned();

        // A non-empty directory cannot be replaced by a file
        let result = env
            .project
            .save_as(&mut env.bench, env.w1, env.temp.path().join("proj/src"));

        assert!(matches!(result, Err(Error::Write { .. })));
        assert_eq!(env.bench.mirror(doc).cloned(), before);
    }

    #[test]
    fn test_save_as_unresolvable_path() {
        let mut env = Env::new();
        env.bench.new_untitled(env.w1, "x");
        let result = env
            .project
            .save_as(&mut env.bench, env.w1, env.temp.path().join("no/such/dir/x.txt"));
        assert!(matches!(result, Err(Error::InvalidPath { .. })));
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Tree Command Tests
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_close_last_tree_clears_project_flag() {
        let mut env = Env::new();
        env.project
            .open_directory(&mut env.bench, env.w1, env.temp.path().join("proj"))
            .unwrap();
        env.project
            .open_directory(&mut env.bench, env.w2, env.temp.path().join("proj/src"))
            .unwrap();

        assert!(env.project.close_tree(&mut env.bench, env.w1));
        assert!(env.project.has_open_project());
        assert!(env.project.close_tree(&mut env.bench, env.w2));
        assert!(!env.project.has_open_project());
        assert!(!env.project.close_tree(&mut env.bench, env.w2));
        assert!(!env.project.refresh_tree(env.w2).unwrap());
    }

    #[test]
    fn test_open_directory_rejects_files() {
        let mut env = Env::new();
        let result = env
            .project
            .open_directory(&mut env.bench, env.w1, env.temp.path().join("proj/a.txt"));
        assert!(matches!(result, Err(Error::InvalidPath { .. })));
        assert!(!env.project.has_open_project());
    }

    #[test]
    fn test_find_files_in_window_tree() {
        let mut env = Env::new();
        assert!(env.project.find_files(env.w1, "lib").is_empty());

        env.project
            .open_directory(&mut env.bench, env.w1, env.temp.path().join("proj"))
            .unwrap();
        let results = env.project.find_files(env.w1, "lib");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].path, env.key("proj/src/lib.rs"));
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Prompt Tests
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_prompt_open_file_remembers_directory() {
        let mut env = Env::new();
        let mut dialogs = ScriptedDialogs::answering(env.path("proj/src/lib.rs"));

        let doc = env
            .project
            .prompt_open_file(&mut env.bench, &mut dialogs, env.w1)
            .unwrap();
        assert!(doc.is_some());
        assert_eq!(env.project.filter_path(), env.key("proj/src").into_path_buf());

        // Next dialog starts there; cancelling opens nothing
        let result = env
            .project
            .prompt_open_file(&mut env.bench, &mut dialogs, env.w1)
            .unwrap();
        assert!(result.is_none());
        assert_eq!(dialogs.asked_in[1], env.key("proj/src").into_path_buf());
    }

    #[test]
    fn test_prompt_open_directory() {
        let mut env = Env::new();
        let mut dialogs = ScriptedDialogs::answering(env.path("proj"));
        assert!(env
            .project
            .prompt_open_directory(&mut env.bench, &mut dialogs, env.w1)
            .unwrap());
        assert!(env.project.has_open_project());
        assert!(!env
            .project
            .prompt_open_directory(&mut env.bench, &mut dialogs, env.w1)
            .unwrap());
    }

    #[test]
    fn test_closed_windows_lose_their_trees() {
        let mut env = Env::new();
        env.project
            .open_directory(&mut env.bench, env.w1, env.temp.path().join("proj"))
            .unwrap();
        env.project
            .open_directory(&mut env.bench, env.w2, env.temp.path().join("proj/src"))
            .unwrap();

        assert_eq!(env.project.forget_closed_windows(&mut env.bench), 0);
        env.bench.close_window(env.w2);
        assert_eq!(env.project.forget_closed_windows(&mut env.bench), 1);

        assert!(env.project.trees().tree(env.w2).is_none());
        assert!(env.project.trees().tree(env.w1).is_some());
        assert!(env.project.has_open_project());
    }

    /// Poll until `done` holds or a few seconds pass.
    fn poll_until(project: &mut Project, mut done: impl FnMut(&Project) -> bool) {
        for _ in 0..50 {
            project.poll_watchers();
            if done(project) {
                return;
            }
            std::thread::sleep(std::time::Duration::from_millis(100));
        }
    }

    #[test]
    fn test_external_rename_refreshes_tree() {
        let mut env = Env::new();
        env.project = Project::new(
            Settings {
                watch_trees: true,
                ..Settings::default()
            },
            Storage::in_memory(),
        );
        env.project
            .open_directory(&mut env.bench, env.w1, env.temp.path().join("proj"))
            .unwrap();
        env.project
            .open_file(&mut env.bench, env.w1, env.temp.path().join("proj/a.txt"))
            .unwrap();
        let renamed = env.key("proj/a.txt");

        fs::rename(env.path("proj/a.txt"), env.path("proj/renamed.txt")).unwrap();

        let window = env.w1;
        let names = move |project: &Project| -> Vec<String> {
            project
                .trees()
                .tree(window)
                .and_then(|tree| tree.root().children())
                .unwrap_or_default()
                .iter()
                .map(|node| node.name.clone())
                .collect()
        };
        poll_until(&mut env.project, |p| {
            names(p).contains(&"renamed.txt".to_string()) && !p.mru().contains(&renamed)
        });

        let listed = names(&env.project);
        assert!(listed.contains(&"renamed.txt".to_string()));
        assert!(!listed.contains(&"a.txt".to_string()));
        assert!(!env.project.mru().contains(&renamed));
    }

    #[test]
    fn test_watch_tree_requires_tree() {
        let mut env = Env::new();
        assert!(matches!(
            env.project.watch_tree(env.w1),
            Err(Error::NoActiveTree)
        ));
        assert!(env.project.poll_watchers().is_empty());
    }
}
