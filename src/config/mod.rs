//! Configuration module for project-tree
//!
//! This module handles user preferences for the project layer, their
//! persistence to platform-specific directories, and the small key-value
//! storage used to remember dialog state between sessions.

mod persistence;
mod settings;
mod storage;

pub use persistence::*;
pub use settings::*;
pub use storage::Storage;
