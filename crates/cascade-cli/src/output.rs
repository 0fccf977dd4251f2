//! Formatted output helpers for CLI commands.

use std::collections::BTreeSet;
use std::fmt::Write;

use cascade_common::types::TriggerTarget;

/// Formats targets one per line, each line terminated by a newline.
#[must_use]
pub fn format_targets(targets: &BTreeSet<TriggerTarget>) -> String {
    targets.iter().fold(String::new(), |mut out, target| {
        let _ = writeln!(out, "{target}");
        out
    })
}

/// Formats targets as a JSON array of strings.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn targets_json(targets: &BTreeSet<TriggerTarget>) -> serde_json::Result<String> {
    let names: Vec<String> = targets.iter().map(ToString::to_string).collect();
    serde_json::to_string(&names)
}
