//! Cluster membership index.
//!
//! Maps every directory named in a `clusters.txt` to the single cluster
//! that owns it. Declaring the same directory in two different clusters is
//! a configuration bug and fails the whole resolution.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::Path;

use cascade_common::error::{CascadeError, Result};
use cascade_common::types::{ClusterId, DirectoryPath};

use crate::parser::{self, ClusterLine};

/// Directory → cluster ownership, built fresh for each resolution run.
#[derive(Debug, Clone, Default)]
pub struct ClusterIndex {
    owners: HashMap<DirectoryPath, ClusterId>,
    members: BTreeMap<ClusterId, BTreeSet<DirectoryPath>>,
}

impl ClusterIndex {
    /// Creates an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `member` as belonging to cluster `id`.
    ///
    /// Returns `Ok(false)` when the exact same registration already exists.
    ///
    /// # Errors
    ///
    /// Returns [`CascadeError::DuplicateClusterMembership`] if `member` is
    /// already owned by a different cluster.
    pub fn register(
        &mut self,
        member: DirectoryPath,
        id: &ClusterId,
        declared_in: &Path,
    ) -> Result<bool> {
        if let Some(existing) = self.owners.get(&member) {
            if existing == id {
                return Ok(false);
            }
            return Err(CascadeError::DuplicateClusterMembership {
                member,
                existing: existing.clone(),
                conflicting: id.clone(),
                declared_in: declared_in.to_path_buf(),
            });
        }

        tracing::debug!(member = %member, cluster = %id, "registering cluster member");
        let _ = self
            .members
            .entry(id.clone())
            .or_default()
            .insert(member.clone());
        let _ = self.owners.insert(member, id.clone());
        Ok(true)
    }

    /// Parses the text of one `clusters.txt` and registers its members.
    ///
    /// Members are resolved relative to `context`, the directory holding the
    /// file. Malformed lines and members are logged and skipped. Returns the
    /// number of new registrations.
    ///
    /// # Errors
    ///
    /// Returns [`CascadeError::DuplicateClusterMembership`] on conflicting
    /// ownership.
    pub fn ingest(&mut self, text: &str, context: &DirectoryPath, source: &Path) -> Result<usize> {
        let mut registered = 0;
        for (line_no, line) in parser::parse_clusters(text) {
            match line {
                ClusterLine::Blank => {}
                ClusterLine::Malformed { reason } => {
                    tracing::warn!(
                        file = %source.display(),
                        line = line_no,
                        %reason,
                        "skipping malformed cluster declaration"
                    );
                }
                ClusterLine::Declaration { id, members } => {
                    if members.is_empty() {
                        tracing::debug!(cluster = %id, "cluster declared without members");
                        let _ = self.members.entry(id.clone()).or_default();
                    }
                    for raw in &members {
                        let Some(relative) = normalize_member(raw) else {
                            tracing::warn!(
                                file = %source.display(),
                                line = line_no,
                                member = %raw,
                                "skipping cluster member outside the declaring directory"
                            );
                            continue;
                        };
                        if self.register(context.join(&relative), &id, source)? {
                            registered += 1;
                        }
                    }
                }
            }
        }
        Ok(registered)
    }

    /// Returns the cluster owning `path`, if any.
    #[must_use]
    pub fn lookup(&self, path: &DirectoryPath) -> Option<&ClusterId> {
        self.owners.get(path)
    }

    /// Returns every declared cluster id in sorted order.
    pub fn cluster_ids(&self) -> impl Iterator<Item = &ClusterId> {
        self.members.keys()
    }

    /// Number of registered member directories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.owners.len()
    }

    /// Returns `true` if no member has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }
}

/// Normalises a member path written in a `clusters.txt`.
///
/// `.` segments and redundant slashes are dropped. Absolute paths and `..`
/// segments would escape the declaring directory and are rejected.
fn normalize_member(raw: &str) -> Option<String> {
    if raw.starts_with('/') {
        return None;
    }
    let mut segments = Vec::new();
    for segment in raw.split('/') {
        match segment {
            "" | "." => {}
            ".." => return None,
            other => segments.push(other),
        }
    }
    if segments.is_empty() {
        None
    } else {
        Some(segments.join("/"))
    }
}
