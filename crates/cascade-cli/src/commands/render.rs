//! `cascade render`: Print the trigger document without uploading it.

use cascade_common::constants::ENV_BUILD;
use cascade_pipeline::render::render_document;
use clap::Args;

use super::ResolveRequest;

/// Arguments for the `render` command.
#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Identifier of the build that published the dependencies.
    #[arg(long, env = ENV_BUILD)]
    pub build: Option<String>,
}

/// Executes the `render` command.
///
/// # Errors
///
/// Returns an error if an input is missing, resolution fails, or the
/// document cannot be serialized.
pub fn execute(args: RenderArgs, request: &ResolveRequest) -> anyhow::Result<()> {
    let build = super::require_build(args.build)?;
    let targets = request.resolve()?;
    match render_document(&targets, &build)? {
        Some(document) => print!("{document}"),
        None => eprintln!("No dependent components found."),
    }
    Ok(())
}
