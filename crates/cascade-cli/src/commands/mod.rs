//! CLI command definitions and dispatch.

pub mod render;
pub mod resolve;
pub mod trigger;

use std::collections::BTreeSet;
use std::path::PathBuf;

use cascade_common::config::ResolverConfig;
use cascade_common::constants::{ENV_BUILD, ENV_DEBUG, ENV_PUBLISHED, ENV_ROOT};
use cascade_common::error::{CascadeError, Result};
use cascade_common::types::{PublishedSet, TriggerTarget};
use cascade_resolve::DependentResolver;
use clap::builder::FalseyValueParser;
use clap::{Parser, Subcommand};

/// Cascade: trigger the builds of components that depend on a publish.
#[derive(Parser, Debug)]
#[command(name = "cascade", version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,

    /// Root of the checkout to walk.
    #[arg(long, global = true, env = ENV_ROOT)]
    pub root: Option<PathBuf>,

    /// Whitespace-delimited names of the components just published.
    #[arg(long, global = true, env = ENV_PUBLISHED)]
    pub published: Option<String>,

    /// Extra directory name to exclude from the walk (repeatable).
    #[arg(long = "skip-dir", global = true)]
    pub skip_dirs: Vec<String>,

    /// Enable debug output.
    #[arg(long, global = true, env = ENV_DEBUG, value_parser = FalseyValueParser::new())]
    pub debug: bool,
}

/// Available CLI subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Resolve dependents and upload their trigger steps.
    Trigger(trigger::TriggerArgs),
    /// Print the dependent trigger targets.
    Resolve(resolve::ResolveArgs),
    /// Print the trigger document without uploading it.
    Render(render::RenderArgs),
}

/// Validated inputs of a resolution run.
#[derive(Debug)]
pub struct ResolveRequest {
    /// Checkout root.
    pub root: PathBuf,
    /// Names just published.
    pub published: PublishedSet,
    resolver: DependentResolver,
}

impl ResolveRequest {
    /// Validates the tree inputs of `cli`.
    ///
    /// # Errors
    ///
    /// Returns [`CascadeError::MissingInput`] if the root or the published
    /// names are absent or empty.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let root = cli
            .root
            .clone()
            .filter(|r| !r.as_os_str().is_empty())
            .ok_or(CascadeError::MissingInput { name: ENV_ROOT })?;
        let published = PublishedSet::from_whitespace(cli.published.as_deref().unwrap_or_default());
        if published.is_empty() {
            return Err(CascadeError::MissingInput {
                name: ENV_PUBLISHED,
            });
        }
        let config = ResolverConfig::default().with_skipped_dirs(cli.skip_dirs.iter().cloned());
        Ok(Self {
            root,
            published,
            resolver: DependentResolver::new(config),
        })
    }

    /// Walks the tree and resolves the trigger targets.
    ///
    /// # Errors
    ///
    /// Returns an error if resolution fails.
    pub fn resolve(&self) -> Result<BTreeSet<TriggerTarget>> {
        self.resolver.resolve(&self.root, &self.published)
    }
}

/// Returns the triggering build identifier, failing if it is absent.
///
/// # Errors
///
/// Returns [`CascadeError::MissingInput`] if `build` is absent or blank.
pub fn require_build(build: Option<String>) -> Result<String> {
    build
        .map(|b| b.trim().to_owned())
        .filter(|b| !b.is_empty())
        .ok_or(CascadeError::MissingInput { name: ENV_BUILD })
}

/// Dispatches the parsed CLI command to its handler.
///
/// All inputs are validated before the tree is walked.
///
/// # Errors
///
/// Returns an error if input validation or the command fails.
pub fn execute(cli: Cli) -> anyhow::Result<()> {
    let request = ResolveRequest::from_cli(&cli)?;
    match cli.command {
        Command::Trigger(args) => trigger::execute(args, &request),
        Command::Resolve(args) => resolve::execute(&args, &request),
        Command::Render(args) => render::execute(args, &request),
    }
}
