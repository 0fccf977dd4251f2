//! `cascade resolve`: Print the dependent trigger targets.

use clap::Args;

use super::ResolveRequest;
use crate::output;

/// Arguments for the `resolve` command.
#[derive(Args, Debug)]
pub struct ResolveArgs {
    /// Print the targets as a JSON array.
    #[arg(long)]
    pub json: bool,
}

/// Executes the `resolve` command.
///
/// # Errors
///
/// Returns an error if resolution fails.
pub fn execute(args: &ResolveArgs, request: &ResolveRequest) -> anyhow::Result<()> {
    let targets = request.resolve()?;
    if args.json {
        println!("{}", output::targets_json(&targets)?);
    } else if targets.is_empty() {
        println!("No dependent components found.");
    } else {
        print!("{}", output::format_targets(&targets));
    }
    Ok(())
}
