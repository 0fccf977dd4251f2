//! Single-pass traversal of the checkout tree.
//!
//! Directories are visited in pre-order without native recursion, so a
//! directory's `clusters.txt` is always registered before any of its
//! descendants is looked at. Symlinks are never followed and skipped
//! directory names (`.git` by default) are pruned with their subtrees.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use cascade_common::config::ResolverConfig;
use cascade_common::error::{CascadeError, Result};
use cascade_common::types::{ComponentName, DirectoryPath};
use walkdir::{DirEntry, WalkDir};

use crate::cluster::ClusterIndex;
use crate::parser::{self, DependencyLine};

/// The components one directory declares it depends on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyDeclaration {
    /// Directory holding the `dependencies.txt`.
    pub directory: DirectoryPath,
    /// Declared component names, in file order, without duplicates.
    pub names: Vec<ComponentName>,
}

/// Everything gathered from one walk of the tree.
#[derive(Debug, Clone, Default)]
pub struct WalkOutcome {
    /// Cluster membership declared anywhere in the tree.
    pub clusters: ClusterIndex,
    /// Non-empty dependency declarations, in visit order.
    pub declarations: Vec<DependencyDeclaration>,
    /// Number of directories visited.
    pub directories_visited: usize,
}

/// Walks the tree under `root`, collecting cluster and dependency
/// declarations.
///
/// # Errors
///
/// Returns an error if `root` is not a readable directory, if any
/// directory or declaration file cannot be read, or if two clusters claim
/// the same directory.
pub fn walk_tree(root: &Path, config: &ResolverConfig) -> Result<WalkOutcome> {
    tracing::info!(root = %root.display(), "walking tree");
    let metadata = std::fs::metadata(root).map_err(|e| CascadeError::Io {
        path: root.to_path_buf(),
        source: e,
    })?;
    if !metadata.is_dir() {
        return Err(CascadeError::Config {
            message: format!("root {} is not a directory", root.display()),
        });
    }

    let mut outcome = WalkOutcome::default();
    let walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| is_walked_directory(entry, config));

    for entry in walker {
        let entry = entry.map_err(|e| CascadeError::Walk {
            path: e.path().map_or_else(|| root.to_path_buf(), Path::to_path_buf),
            message: e.to_string(),
        })?;
        let relative = entry
            .path()
            .strip_prefix(root)
            .map_err(|e| CascadeError::Walk {
                path: entry.path().to_path_buf(),
                message: e.to_string(),
            })?;
        let directory = DirectoryPath::from_relative(relative);
        visit_directory(entry.path(), &directory, config, &mut outcome)?;
        outcome.directories_visited += 1;
    }

    tracing::info!(
        directories = outcome.directories_visited,
        clusters = outcome.clusters.cluster_ids().count(),
        cluster_members = outcome.clusters.len(),
        declarations = outcome.declarations.len(),
        "walk complete"
    );
    Ok(outcome)
}

fn is_walked_directory(entry: &DirEntry, config: &ResolverConfig) -> bool {
    if !entry.file_type().is_dir() {
        return false;
    }
    entry.depth() == 0 || !config.is_skipped(&entry.file_name().to_string_lossy())
}

fn visit_directory(
    path: &Path,
    directory: &DirectoryPath,
    config: &ResolverConfig,
    outcome: &mut WalkOutcome,
) -> Result<()> {
    tracing::debug!(directory = %directory, "visiting directory");

    let clusters_path = path.join(&config.clusters_file);
    if let Some(text) = read_optional(&clusters_path)? {
        let registered = outcome.clusters.ingest(&text, directory, &clusters_path)?;
        tracing::debug!(file = %clusters_path.display(), registered, "read cluster declarations");
    }

    let dependencies_path = path.join(&config.dependencies_file);
    let Some(text) = read_optional(&dependencies_path)? else {
        return Ok(());
    };
    if directory.is_root() {
        tracing::warn!(
            file = %dependencies_path.display(),
            "ignoring dependency declarations at the tree root"
        );
        return Ok(());
    }

    let names = declared_names(&text, &dependencies_path);
    if !names.is_empty() {
        outcome.declarations.push(DependencyDeclaration {
            directory: directory.clone(),
            names,
        });
    }
    Ok(())
}

fn declared_names(text: &str, source: &Path) -> Vec<ComponentName> {
    let mut names: Vec<ComponentName> = Vec::new();
    for (line_no, line) in parser::parse_dependencies(text) {
        match line {
            DependencyLine::Name(name) => {
                if !names.contains(&name) {
                    names.push(name);
                }
            }
            DependencyLine::Malformed { reason } => {
                tracing::warn!(
                    file = %source.display(),
                    line = line_no,
                    %reason,
                    "skipping malformed dependency declaration"
                );
            }
            DependencyLine::Blank => {}
        }
    }
    names
}

/// Reads a declaration file, treating its absence as normal.
///
/// A directory carrying the declaration file's name counts as absent. Any
/// other failure to read the file is fatal.
fn read_optional(path: &Path) -> Result<Option<String>> {
    match std::fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(_) if std::fs::metadata(path).is_ok_and(|m| m.is_dir()) => Ok(None),
        Err(e) => Err(CascadeError::Io {
            path: PathBuf::from(path),
            source: e,
        }),
    }
}
