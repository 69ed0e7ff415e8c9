//! End-to-end flows through the public `Project` API.

use project_tree::config::{Settings, Storage};
use project_tree::{DocumentHost, Error, MemoryWorkbench, Mirror, Opened, PathKey, Project};
use std::cell::RefCell;
use std::fs;
use std::rc::Rc;
use tempfile::TempDir;

fn workspace() -> TempDir {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("workspace");
    fs::create_dir_all(root.join("docs")).unwrap();
    fs::create_dir_all(root.join("node_modules").join("dep")).unwrap();
    fs::write(root.join("notes.md"), "# Notes").unwrap();
    fs::write(root.join("todo.txt"), "- ship it").unwrap();
    fs::write(root.join("docs").join("guide.md"), "guide").unwrap();
    fs::write(root.join("node_modules").join("dep").join("index.js"), "").unwrap();
    temp
}

fn key(temp: &TempDir, rel: &str) -> PathKey {
    PathKey::canonicalize(temp.path().join(rel)).unwrap()
}

#[test]
fn test_editing_session() {
    let temp = workspace();
    let storage = Storage::open_at(temp.path().join("storage.json"));
    let mut project = Project::new(Settings::default(), storage);
    let mut bench = MemoryWorkbench::new();
    let window = bench.add_window();

    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    project
        .trees_mut()
        .signal_mut()
        .subscribe(move |open| sink.borrow_mut().push(open));

    // Startup with a directory and a file
    let args = [
        temp.path().join("workspace"),
        temp.path().join("workspace/notes.md"),
    ];
    assert_eq!(project.start(&mut bench, window, args), 2);
    assert!(project.has_open_project());

    // Hidden directories never reach the tree or find-file
    let tree = project.trees().tree(window).unwrap();
    let names: Vec<&str> = tree
        .root()
        .children()
        .unwrap()
        .iter()
        .map(|node| node.name.as_str())
        .collect();
    assert_eq!(names, vec!["docs", "notes.md", "todo.txt"]);
    assert!(project.find_files(window, "index").is_empty());

    // Switching files builds the MRU list
    project
        .open_file(&mut bench, window, temp.path().join("workspace/todo.txt"))
        .unwrap();
    project
        .open_file(&mut bench, window, temp.path().join("workspace/docs/guide.md"))
        .unwrap();
    assert_eq!(
        project.most_recent_used_files(),
        vec![
            key(&temp, "workspace/docs/guide.md"),
            key(&temp, "workspace/todo.txt"),
            key(&temp, "workspace/notes.md"),
        ]
    );

    // Empty query lists recent files first
    let results = project.find_files(window, "");
    assert_eq!(results[0].path, key(&temp, "workspace/docs/guide.md"));
    assert!(results[0].is_recent);

    // Save-as shows the new file in the tree
    project
        .save_as(&mut bench, window, temp.path().join("workspace/docs/copy.md"))
        .unwrap();
    let copy = key(&temp, "workspace/docs/copy.md");
    assert_eq!(fs::read_to_string(copy.as_path()).unwrap(), "guide");
    assert_eq!(project.find_files(window, "copy")[0].path, copy);

    assert!(project.close_tree(&mut bench, window));
    assert!(!project.has_open_project());
    assert_eq!(*seen.borrow(), vec![true, false]);
}

#[test]
fn test_documents_are_shared_across_windows() {
    let temp = workspace();
    let mut project = Project::default();
    let mut bench = MemoryWorkbench::new();
    let left = bench.add_window();
    let right = bench.add_window();

    let Opened::Document(first) = project
        .open_path(&mut bench, left, temp.path().join("workspace/notes.md"))
        .unwrap()
    else {
        panic!("Expected a document");
    };
    let second = project
        .open_file(&mut bench, right, temp.path().join("workspace/docs/../notes.md"))
        .unwrap();

    assert_eq!(first, second);
    assert_eq!(bench.documents().len(), 1);
    assert_eq!(
        bench.mirror(first).and_then(Mirror::file_path),
        Some(&key(&temp, "workspace/notes.md"))
    );
}

#[test]
fn test_invalid_paths_are_reported() {
    let temp = workspace();
    let mut project = Project::default();
    let mut bench = MemoryWorkbench::new();
    let window = bench.add_window();

    let err = project
        .open_path(&mut bench, window, temp.path().join("missing/dir"))
        .unwrap_err();
    assert!(matches!(err, Error::InvalidPath { .. }));
    assert!(err.to_string().contains("missing"));
    assert!(!project.has_open_project());
    assert!(project.mru().is_empty());
}

#[test]
fn test_last_dialog_directory_survives_restart() {
    let temp = workspace();
    let storage_path = temp.path().join("storage.json");

    {
        let mut storage = Storage::open_at(&storage_path);
        storage
            .set("last_dir", temp.path().join("workspace").to_string_lossy())
            .unwrap();
    }

    let project = Project::new(Settings::default(), Storage::open_at(&storage_path));
    assert_eq!(project.filter_path(), temp.path().join("workspace"));
}
