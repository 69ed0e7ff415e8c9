//! Fuzzy file finding within a project tree.
//!
//! Scores files by their path relative to the tree root with the skim
//! algorithm, boosting recently used files.

use crate::path_key::PathKey;
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use std::fmt;

/// A single find-file result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FindResult {
    pub path: PathKey,
    /// Path relative to the tree root, as displayed
    pub relative_path: String,
    /// Whether the file is in the MRU list
    pub is_recent: bool,
    pub score: i64,
}

impl FindResult {
    fn new(path: PathKey, root: &PathKey, is_recent: bool, score: i64) -> Self {
        let relative_path = relative_to(&path, root);
        Self {
            path,
            relative_path,
            is_recent,
            score,
        }
    }
}

/// Stateless fuzzy matcher over file lists.
pub struct FileFinder {
    matcher: SkimMatcherV2,
    max_results: usize,
    recent_boost: i64,
}

impl fmt::Debug for FileFinder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileFinder")
            .field("max_results", &self.max_results)
            .field("recent_boost", &self.recent_boost)
            .finish()
    }
}

impl FileFinder {
    pub fn new(max_results: usize, recent_boost: i64) -> Self {
        Self {
            matcher: SkimMatcherV2::default(),
            max_results,
            recent_boost,
        }
    }

    /// Rank `files` (below `root`) against `query`.
    ///
    /// An empty query lists recent files first (in MRU order), then the
    /// remaining files in their given order.
    pub fn find(
        &self,
        query: &str,
        root: &PathKey,
        files: &[PathKey],
        recent: &[PathKey],
    ) -> Vec<FindResult> {
        if query.trim().is_empty() {
            return self.unfiltered(root, files, recent);
        }

        let mut scored: Vec<FindResult> = files
            .iter()
            .filter_map(|path| {
                let display = relative_to(path, root);
                let score = self.matcher.fuzzy_match(&display, query)?;
                let is_recent = recent.contains(path);
                let boosted = if is_recent {
                    score + self.recent_boost
                } else {
                    score
                };
                Some(FindResult::new(path.clone(), root, is_recent, boosted))
            })
            .collect();

        // Highest score first; ties by path for a stable order
        scored.sort_by(|a, b| {
            b.score
                .cmp(&a.score)
                .then_with(|| a.relative_path.cmp(&b.relative_path))
        });
        scored.truncate(self.max_results);
        scored
    }

    fn unfiltered(&self, root: &PathKey, files: &[PathKey], recent: &[PathKey]) -> Vec<FindResult> {
        let mut results: Vec<FindResult> = recent
            .iter()
            .filter(|path| files.contains(path))
            .take(self.max_results)
            .map(|path| FindResult::new(path.clone(), root, true, 0))
            .collect();

        for path in files {
            if results.len() >= self.max_results {
                break;
            }
            if !results.iter().any(|r| &r.path == path) {
                results.push(FindResult::new(path.clone(), root, false, 0));
            }
        }
        results
    }
}

fn relative_to(path: &PathKey, root: &PathKey) -> String {
    path.as_path()
        .strip_prefix(root.as_path())
        .unwrap_or(path.as_path())
        .to_string_lossy()
        .into_owned()
}
