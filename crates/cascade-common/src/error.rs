//! Unified error types for the Cascade workspace.
//!
//! Every variant here is fatal to a resolution run. Recoverable problems
//! (malformed declaration lines) are reported as values by the parser and
//! logged by the caller instead of being raised.

use std::path::PathBuf;

use thiserror::Error;

use crate::types::{ClusterId, DirectoryPath};

/// Top-level error type shared across the workspace.
#[derive(Debug, Error)]
pub enum CascadeError {
    /// An I/O operation failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path where the I/O error occurred.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A directory entry could not be read while walking the tree.
    #[error("cannot walk {path}: {message}")]
    Walk {
        /// Path of the entry that failed.
        path: PathBuf,
        /// Description of the traversal failure.
        message: String,
    },

    /// A directory was declared as a member of two different clusters.
    #[error(
        "duplicate cluster membership: {member} belongs to cluster {existing} \
         and cannot also join cluster {conflicting} (declared in {declared_in})"
    )]
    DuplicateClusterMembership {
        /// The directory registered twice.
        member: DirectoryPath,
        /// Cluster the directory was already registered to.
        existing: ClusterId,
        /// Cluster the second declaration tried to register it to.
        conflicting: ClusterId,
        /// `clusters.txt` holding the conflicting declaration.
        declared_in: PathBuf,
    },

    /// A required process input was not supplied.
    #[error("missing required input: {name}")]
    MissingInput {
        /// Name of the missing input (argument or environment variable).
        name: &'static str,
    },

    /// A configuration value is invalid.
    #[error("invalid configuration: {message}")]
    Config {
        /// Description of the invalid configuration.
        message: String,
    },

    /// The trigger document could not be serialized.
    #[error("failed to render trigger document: {source}")]
    Render {
        /// Underlying serialization error.
        #[from]
        source: serde_yaml::Error,
    },

    /// Handing the trigger document to the publishing step failed.
    #[error("pipeline upload failed: {message}")]
    Upload {
        /// Description of the failure, including the step's stderr when available.
        message: String,
    },
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, CascadeError>;
