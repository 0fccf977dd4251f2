//! # cascade-resolve
//!
//! Finds the components of a monorepo that depend on a set of
//! just-published names.
//!
//! Handles:
//! - **Parser**: classification of `dependencies.txt` and `clusters.txt` lines.
//! - **Cluster**: the directory → cluster ownership index.
//! - **Walk**: the single pre-order pass over the checkout tree.
//! - **Resolver**: matching declarations into deduplicated trigger targets.

pub mod cluster;
pub mod parser;
pub mod resolver;
pub mod walk;

pub use cluster::ClusterIndex;
pub use resolver::{DependentResolver, resolve};
