//! User settings for the project layer
//!
//! This module defines the `Settings` struct that holds the user-configurable
//! options of project trees and file finding, with serde support for JSON
//! persistence.

use crate::tree::HiddenPatterns;
use serde::{Deserialize, Serialize};

/// Project-layer settings, persisted as JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // ─────────────────────────────────────────────────────────────────────────
    // Project Trees
    // ─────────────────────────────────────────────────────────────────────────
    /// Names hidden from trees and file searches (exact or `*suffix`)
    pub hidden_patterns: Vec<String>,

    /// Dot files that stay visible even though dot files are hidden
    pub allowed_dot_files: Vec<String>,

    /// Whether to watch open trees for external changes
    pub watch_trees: bool,

    // ─────────────────────────────────────────────────────────────────────────
    // Find File
    // ─────────────────────────────────────────────────────────────────────────
    /// Maximum number of results returned by find-file
    pub max_find_results: usize,

    /// Score bonus for recently used files in find-file results
    pub recent_boost: i64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            hidden_patterns: Self::DEFAULT_HIDDEN_PATTERNS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            allowed_dot_files: Self::DEFAULT_ALLOWED_DOT_FILES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            watch_trees: false,
            max_find_results: 15,
            recent_boost: 100,
        }
    }
}

impl Settings {
    /// Patterns hidden unless the user configures otherwise.
    pub const DEFAULT_HIDDEN_PATTERNS: &'static [&'static str] = &[
        ".git",
        ".svn",
        ".hg",
        "node_modules",
        "target",
        ".idea",
        ".vscode",
        "__pycache__",
        ".DS_Store",
        "Thumbs.db",
    ];

    /// Dot files worth showing in a tree.
    pub const DEFAULT_ALLOWED_DOT_FILES: &'static [&'static str] = &[
        ".gitignore",
        ".env",
        ".env.example",
        ".editorconfig",
        ".prettierrc",
        ".eslintrc",
    ];

    /// Minimum number of find-file results.
    pub const MIN_FIND_RESULTS: usize = 1;
    /// Maximum number of find-file results.
    pub const MAX_FIND_RESULTS: usize = 200;
    /// Maximum recent-file score bonus.
    pub const MAX_RECENT_BOOST: i64 = 1000;

    /// Hidden-entry rules for trees built with these settings.
    pub fn hidden(&self) -> HiddenPatterns {
        HiddenPatterns::new(self.hidden_patterns.clone(), self.allowed_dot_files.clone())
    }

    /// Clamp values to valid ranges.
    ///
    /// This is useful after loading settings from a file that might have
    /// been manually edited with invalid values.
    pub fn sanitize(&mut self) {
        self.max_find_results = self
            .max_find_results
            .clamp(Self::MIN_FIND_RESULTS, Self::MAX_FIND_RESULTS);

        self.recent_boost = self.recent_boost.clamp(0, Self::MAX_RECENT_BOOST);

        // Blank patterns would never match anything useful
        self.hidden_patterns.retain(|p| !p.trim().is_empty());
        self.hidden_patterns.dedup();
    }

    /// Parse settings from JSON and sanitize them.
    pub fn from_json_sanitized(json: &str) -> Result<Self, serde_json::Error> {
        let mut settings: Self = serde_json::from_str(json)?;
        settings.sanitize();
        Ok(settings)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
