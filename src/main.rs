//! project-tree - Headless Entry Point
//!
//! Opens the paths given on the command line the way an editor would at
//! startup: directories as project trees, files as documents. Prints the
//! resulting trees and recently used files.

use log::{info, warn};
use project_tree::config::{init_config, load_config, Storage};
use project_tree::project::STORAGE_NAME;
use project_tree::{DocumentHost, MemoryWorkbench, Project, TreeNode};

/// Application name constant.
const APP_NAME: &str = "project-tree";

fn main() {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("Starting {}", APP_NAME);

    let settings = load_config();
    if init_config(&settings) {
        info!("Wrote default settings file");
    }
    let storage = Storage::open(STORAGE_NAME);
    let mut project = Project::new(settings, storage);

    let mut bench = MemoryWorkbench::new();
    let window = bench.add_window();

    let opened = project.start(&mut bench, window, std::env::args_os().skip(1));
    if opened == 0 {
        warn!("Nothing opened; pass directories or files as arguments");
    }

    if let Some(tree) = project.trees().tree(window) {
        println!("{}", tree.root_path());
        print_children(tree.root(), 1);
        println!("{} file(s) in project", tree.all_files().len());
    }

    for document in bench.documents().into_iter().map(|(id, _)| id) {
        if let Some(path) = bench.mirror(document).map(|m| m.path().to_string()) {
            println!("{} {}", document, path);
        }
    }

    for path in project.most_recent_used_files() {
        println!("recent: {}", path);
    }

    info!("Shutting down");
}

fn print_children(node: &TreeNode, depth: usize) {
    let Some(children) = node.children() else {
        return;
    };
    for child in children {
        let marker = if child.is_directory() { "/" } else { "" };
        println!("{}{}{}", "  ".repeat(depth), child.name, marker);
    }
}
