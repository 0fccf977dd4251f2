//! Domain primitive types used across the Cascade workspace.

use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::CLUSTER_TARGET_PREFIX;

/// Slash-separated path of a directory relative to the tree root.
///
/// The root itself is the empty path.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DirectoryPath(String);

impl DirectoryPath {
    /// Creates a directory path from an already-normalised string.
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// Returns the tree root.
    #[must_use]
    pub const fn root() -> Self {
        Self(String::new())
    }

    /// Builds a directory path from a filesystem path relative to the root.
    ///
    /// Components are joined with `/` regardless of the host separator.
    #[must_use]
    pub fn from_relative(path: &Path) -> Self {
        let joined = path
            .components()
            .filter_map(|c| match c {
                std::path::Component::Normal(name) => Some(name.to_string_lossy()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("/");
        Self(joined)
    }

    /// Appends a relative, slash-separated child path.
    #[must_use]
    pub fn join(&self, child: &str) -> Self {
        if self.0.is_empty() {
            Self(child.to_owned())
        } else {
            Self(format!("{}/{child}", self.0))
        }
    }

    /// Returns `true` for the tree root.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the inner string representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DirectoryPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            write!(f, ".")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// Name of a publishable unit, as written in `dependencies.txt` and in the
/// published-names input.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ComponentName(String);

impl ComponentName {
    /// Creates a component name from a string value.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the inner string representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ComponentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a cluster declared in a `clusters.txt` file.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ClusterId(String);

impl ClusterId {
    /// Creates a cluster identifier from a string value.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the inner string representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the `cluster/<id>` alias under which the cluster can be
    /// published and depended upon.
    #[must_use]
    pub fn alias(&self) -> ComponentName {
        ComponentName(format!("{CLUSTER_TARGET_PREFIX}{}", self.0))
    }
}

impl fmt::Display for ClusterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A unit that receives a downstream build trigger.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TriggerTarget {
    /// A single directory.
    Directory(DirectoryPath),
    /// A whole cluster, rendered as `cluster/<id>`.
    Cluster(ClusterId),
}

impl TriggerTarget {
    /// Returns the pipeline slug for this target: lowercased, with `/`
    /// replaced by `-`.
    #[must_use]
    pub fn slug(&self) -> String {
        self.to_string().replace('/', "-").to_lowercase()
    }
}

impl fmt::Display for TriggerTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Directory(path) => write!(f, "{path}"),
            Self::Cluster(id) => write!(f, "{CLUSTER_TARGET_PREFIX}{id}"),
        }
    }
}

/// The set of component names that were just published.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublishedSet(HashSet<ComponentName>);

impl PublishedSet {
    /// Splits a whitespace-delimited list of names.
    #[must_use]
    pub fn from_whitespace(input: &str) -> Self {
        input.split_whitespace().map(ComponentName::new).collect()
    }

    /// Returns `true` if `name` was published.
    #[must_use]
    pub fn contains(&self, name: &ComponentName) -> bool {
        self.0.contains(name)
    }

    /// Adds a name, returning `true` if it was not already present.
    pub fn insert(&mut self, name: ComponentName) -> bool {
        self.0.insert(name)
    }

    /// Returns the number of published names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if nothing was published.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the published names in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &ComponentName> {
        self.0.iter()
    }
}

impl FromIterator<ComponentName> for PublishedSet {
    fn from_iter<I: IntoIterator<Item = ComponentName>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
