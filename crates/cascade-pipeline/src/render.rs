//! Trigger document rendering.
//!
//! One asynchronous trigger step is emitted per target, each carrying the
//! identifier of the build that published the dependency.

use std::collections::{BTreeMap, BTreeSet};

use cascade_common::constants::DEPENDENCY_TRIGGER_VAR;
use cascade_common::error::Result;
use cascade_common::types::TriggerTarget;
use serde::{Deserialize, Serialize};

/// A pipeline document made only of trigger steps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineDocument {
    /// Steps in target order.
    pub steps: Vec<TriggerStep>,
}

/// A step that triggers a downstream pipeline without waiting for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerStep {
    /// Slug of the pipeline to trigger.
    pub trigger: String,
    /// Whether the step completes without waiting for the triggered build.
    #[serde(rename = "async")]
    pub is_async: bool,
    /// Attributes of the triggered build.
    pub build: TriggeredBuild,
}

/// Attributes passed to the triggered build.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggeredBuild {
    /// Environment of the triggered build.
    pub env: BTreeMap<String, String>,
}

impl TriggerStep {
    /// Builds the step for one target.
    #[must_use]
    pub fn for_target(target: &TriggerTarget, triggering_build: &str) -> Self {
        let mut env = BTreeMap::new();
        let _ = env.insert(DEPENDENCY_TRIGGER_VAR.to_owned(), triggering_build.to_owned());
        Self {
            trigger: target.slug(),
            is_async: true,
            build: TriggeredBuild { env },
        }
    }
}

impl PipelineDocument {
    /// Builds one step per target.
    ///
    /// Targets whose slugs collide (for example `Teams/Alpha` and
    /// `teams/alpha`) would trigger the same pipeline twice, so only the
    /// first one is kept.
    #[must_use]
    pub fn for_targets<'a, I>(targets: I, triggering_build: &str) -> Self
    where
        I: IntoIterator<Item = &'a TriggerTarget>,
    {
        let mut seen = BTreeSet::new();
        let mut steps = Vec::new();
        for target in targets {
            let step = TriggerStep::for_target(target, triggering_build);
            if !seen.insert(step.trigger.clone()) {
                tracing::warn!(target = %target, slug = %step.trigger, "dropping target with duplicate pipeline slug");
                continue;
            }
            tracing::debug!(target = %target, slug = %step.trigger, "adding trigger step");
            steps.push(step);
        }
        Self { steps }
    }

    /// Returns `true` if the document has no steps.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Serializes the document as YAML.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

/// Renders the trigger document for `targets`.
///
/// Returns `None` when there is nothing to trigger, so that no document is
/// ever produced for an empty result.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn render_document(
    targets: &BTreeSet<TriggerTarget>,
    triggering_build: &str,
) -> Result<Option<String>> {
    let document = PipelineDocument::for_targets(targets, triggering_build);
    if document.is_empty() {
        return Ok(None);
    }
    tracing::info!(
        build = triggering_build,
        steps = document.steps.len(),
        "rendering trigger steps"
    );
    document.to_yaml().map(Some)
}
