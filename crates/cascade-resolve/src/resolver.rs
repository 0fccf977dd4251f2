//! Dependent resolution.
//!
//! Turns a set of just-published component names into the set of trigger
//! targets whose declared dependencies include one of them.
//!
//! Cluster promotion is tied to the membership of the depending directory:
//! when two or more members of the same cluster depend on the same
//! published name, they collapse into a single `cluster/<id>` target. A
//! member that is the only one in its cluster to match a name is triggered
//! on its own.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::Path;

use cascade_common::config::ResolverConfig;
use cascade_common::error::Result;
use cascade_common::types::{ClusterId, ComponentName, DirectoryPath, PublishedSet, TriggerTarget};

use crate::cluster::ClusterIndex;
use crate::walk::{self, WalkOutcome};

/// Resolves downstream trigger targets for a tree.
#[derive(Debug, Clone, Default)]
pub struct DependentResolver {
    config: ResolverConfig,
}

impl DependentResolver {
    /// Creates a resolver with the given walk settings.
    #[must_use]
    pub const fn new(config: ResolverConfig) -> Self {
        Self { config }
    }

    /// Returns the walk settings.
    #[must_use]
    pub const fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Walks `root` once and returns every target depending on a name in
    /// `published`.
    ///
    /// # Errors
    ///
    /// Returns an error if the tree cannot be read or cluster membership is
    /// ambiguous. No partial result is returned in either case.
    pub fn resolve(&self, root: &Path, published: &PublishedSet) -> Result<BTreeSet<TriggerTarget>> {
        tracing::info!(
            root = %root.display(),
            published = published.len(),
            "resolving dependents"
        );
        let outcome = walk::walk_tree(root, &self.config)?;
        let targets = collect_targets(&outcome, published);
        tracing::info!(targets = targets.len(), "resolution complete");
        Ok(targets)
    }
}

/// Walks `root` with the default configuration and resolves dependents.
///
/// # Errors
///
/// See [`DependentResolver::resolve`].
pub fn resolve(root: &Path, published: &PublishedSet) -> Result<BTreeSet<TriggerTarget>> {
    DependentResolver::default().resolve(root, published)
}

/// Matches the declarations gathered by a walk against `published`.
#[must_use]
pub fn collect_targets(outcome: &WalkOutcome, published: &PublishedSet) -> BTreeSet<TriggerTarget> {
    let effective = effective_published(&outcome.clusters, published);

    let mut matches: BTreeMap<&ComponentName, BTreeSet<&DirectoryPath>> = BTreeMap::new();
    for declaration in &outcome.declarations {
        for name in &declaration.names {
            if effective.contains(name) {
                tracing::debug!(
                    directory = %declaration.directory,
                    dependency = %name,
                    "matched published dependency"
                );
                let _ = matches
                    .entry(name)
                    .or_default()
                    .insert(&declaration.directory);
            }
        }
    }

    let mut targets = BTreeSet::new();
    for (name, directories) in &matches {
        let mut per_cluster: HashMap<&ClusterId, usize> = HashMap::new();
        for directory in directories {
            if let Some(id) = outcome.clusters.lookup(directory) {
                *per_cluster.entry(id).or_default() += 1;
            }
        }

        for directory in directories {
            let target = match outcome.clusters.lookup(directory) {
                Some(id) if per_cluster.get(id).copied().unwrap_or(0) > 1 => {
                    TriggerTarget::Cluster(id.clone())
                }
                _ => TriggerTarget::Directory((*directory).clone()),
            };
            if targets.insert(target.clone()) {
                tracing::debug!(target = %target, dependency = %name, "adding dependent");
            }
        }
    }
    targets
}

/// Published names plus the `cluster/<id>` alias of every cluster with a
/// published member.
fn effective_published(clusters: &ClusterIndex, published: &PublishedSet) -> PublishedSet {
    let mut effective = published.clone();
    for name in published.iter() {
        if let Some(id) = clusters.lookup(&DirectoryPath::new(name.as_str())) {
            let alias = id.alias();
            if effective.insert(alias.clone()) {
                tracing::debug!(member = %name, alias = %alias, "member publish implies cluster alias");
            }
        }
    }
    effective
}
