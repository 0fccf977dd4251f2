//! System-wide constants: declaration file names, environment variables,
//! and defaults.

/// Per-directory dependency declaration file.
pub const DEPENDENCIES_FILE: &str = "dependencies.txt";

/// Cluster declaration file.
pub const CLUSTERS_FILE: &str = "clusters.txt";

/// Directory names never descended into.
pub const DEFAULT_SKIPPED_DIRS: &[&str] = &[".git"];

/// Prefix of a cluster trigger target and of a cluster alias.
pub const CLUSTER_TARGET_PREFIX: &str = "cluster/";

/// Comment marker in declaration files.
pub const COMMENT_MARKER: char = '#';

/// Separator between a cluster id and its members.
pub const CLUSTER_ASSIGN: char = '=';

/// Environment variable holding the checkout root to walk.
pub const ENV_ROOT: &str = "BUILDKITE_BUILD_CHECKOUT_PATH";

/// Environment variable holding the whitespace-delimited published names.
pub const ENV_PUBLISHED: &str = "PUBLISHED_DEPENDENCIES";

/// Environment variable holding the triggering build identifier.
pub const ENV_BUILD: &str = "PUBLISHED_BUILD";

/// Environment variable enabling verbose output.
pub const ENV_DEBUG: &str = "DEBUG_OUTPUT";

/// Environment variable overriding the pipeline upload executable.
pub const ENV_AGENT: &str = "BUILDKITE_AGENT_PATH";

/// Environment variable passed to every triggered downstream build.
pub const DEPENDENCY_TRIGGER_VAR: &str = "DEPENDENCY_TRIGGER";

/// Default executable used to hand off the trigger document.
pub const DEFAULT_AGENT: &str = "buildkite-agent";

