//! Resolver configuration model.

use serde::{Deserialize, Serialize};

use crate::constants::{CLUSTERS_FILE, DEFAULT_SKIPPED_DIRS, DEPENDENCIES_FILE};

/// Settings for a single resolution run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// File name holding a directory's dependency declarations.
    pub dependencies_file: String,
    /// File name holding cluster declarations.
    pub clusters_file: String,
    /// Directory names excluded from the walk, together with their subtrees.
    pub skipped_dirs: Vec<String>,
}

impl ResolverConfig {
    /// Adds extra directory names to skip, ignoring ones already present.
    #[must_use]
    pub fn with_skipped_dirs<I, S>(mut self, dirs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for dir in dirs {
            let dir = dir.into();
            if !self.skipped_dirs.contains(&dir) {
                self.skipped_dirs.push(dir);
            }
        }
        self
    }

    /// Returns `true` if a directory with this name must not be entered.
    #[must_use]
    pub fn is_skipped(&self, name: &str) -> bool {
        self.skipped_dirs.iter().any(|d| d == name)
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            dependencies_file: DEPENDENCIES_FILE.to_owned(),
            clusters_file: CLUSTERS_FILE.to_owned(),
            skipped_dirs: DEFAULT_SKIPPED_DIRS.iter().map(|d| (*d).to_owned()).collect(),
        }
    }
}
