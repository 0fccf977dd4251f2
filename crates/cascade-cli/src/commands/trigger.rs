//! `cascade trigger`: Resolve dependents and upload their trigger steps.

use std::collections::BTreeSet;

use cascade_common::constants::{DEFAULT_AGENT, ENV_AGENT, ENV_BUILD};
use cascade_common::types::TriggerTarget;
use cascade_pipeline::render::PipelineDocument;
use cascade_pipeline::upload::{AgentUploader, Uploader};
use clap::Args;

use super::ResolveRequest;

/// Arguments for the `trigger` command.
#[derive(Args, Debug)]
pub struct TriggerArgs {
    /// Identifier of the build that published the dependencies.
    #[arg(long, env = ENV_BUILD)]
    pub build: Option<String>,

    /// Executable that accepts the rendered pipeline on stdin.
    #[arg(long, env = ENV_AGENT, default_value = DEFAULT_AGENT)]
    pub agent: String,
}

/// Executes the `trigger` command.
///
/// Walks the tree, renders one trigger step per dependent, and hands the
/// document to the agent. Finding no dependents is not an error.
///
/// # Errors
///
/// Returns an error if an input is missing, resolution fails, or the
/// upload fails.
pub fn execute(args: TriggerArgs, request: &ResolveRequest) -> anyhow::Result<()> {
    let build = super::require_build(args.build)?;
    let targets = request.resolve()?;

    let agent = args.agent;
    let triggered = dispatch(&targets, &build, || {
        AgentUploader::locate(&agent).map_err(anyhow::Error::from)
    })?;
    if triggered == 0 {
        println!("No dependent components found.");
    } else {
        println!("Triggered {triggered} dependent build(s) for {build}.");
    }
    Ok(())
}

/// Renders `targets` and hands the document to the uploader built by
/// `uploader`. The uploader is only built when there is something to
/// upload. Returns the number of trigger steps uploaded.
fn dispatch<U, F>(
    targets: &BTreeSet<TriggerTarget>,
    build: &str,
    uploader: F,
) -> anyhow::Result<usize>
where
    U: Uploader,
    F: FnOnce() -> anyhow::Result<U>,
{
    let document = PipelineDocument::for_targets(targets, build);
    if document.is_empty() {
        tracing::info!("no dependents found");
        return Ok(0);
    }
    uploader()?.upload(&document.to_yaml()?)?;
    Ok(document.steps.len())
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use cascade_common::error::{CascadeError, Result};
    use cascade_common::types::{ClusterId, DirectoryPath};

    use super::*;

    #[derive(Default)]
    struct Recorder {
        documents: RefCell<Vec<String>>,
    }

    impl Uploader for &Recorder {
        fn upload(&self, document: &str) -> Result<()> {
            self.documents.borrow_mut().push(document.to_owned());
            Ok(())
        }
    }

    struct Rejecting;

    impl Uploader for Rejecting {
        fn upload(&self, _document: &str) -> Result<()> {
            Err(CascadeError::Upload {
                message: "rejected".into(),
            })
        }
    }

    #[test]
    fn empty_targets_never_build_uploader() {
        let result = dispatch(&BTreeSet::new(), "b-1", || -> anyhow::Result<Rejecting> {
            anyhow::bail!("uploader must not be built")
        });
        assert_eq!(result.expect("dispatch"), 0);
    }

    #[test]
    fn targets_are_uploaded_once() {
        let recorder = Recorder::default();
        let targets = BTreeSet::from([
            TriggerTarget::Directory(DirectoryPath::new("teams/alpha")),
            TriggerTarget::Cluster(ClusterId::new("shared-libs")),
        ]);
        let count = dispatch(&targets, "build-42", || Ok(&recorder)).expect("dispatch");
        assert_eq!(count, 2);

        let documents = recorder.documents.borrow();
        assert_eq!(documents.len(), 1);
        assert!(documents[0].contains("trigger: teams-alpha"));
        assert!(documents[0].contains("trigger: cluster-shared-libs"));
    }

    #[test]
    fn colliding_slugs_count_uploaded_steps() {
        let recorder = Recorder::default();
        let targets = BTreeSet::from([
            TriggerTarget::Directory(DirectoryPath::new("Teams/Alpha")),
            TriggerTarget::Directory(DirectoryPath::new("teams/alpha")),
        ]);
        let count = dispatch(&targets, "build-42", || Ok(&recorder)).expect("dispatch");
        assert_eq!(count, 1);
        assert_eq!(
            recorder.documents.borrow()[0].matches("trigger: teams-alpha").count(),
            1
        );
    }

    #[test]
    fn upload_failure_is_fatal() {
        let targets = BTreeSet::from([TriggerTarget::Directory(DirectoryPath::new("svc"))]);
        let err = dispatch(&targets, "b", || Ok(Rejecting)).unwrap_err();
        assert!(err.to_string().contains("rejected"), "got: {err}");
    }
}
