//! Exit behaviour and output of the `cascade` binary.

use std::path::Path;
use std::process::{Command, Output};

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("mkdir");
    }
    std::fs::write(path, content).expect("write");
}

fn cascade(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_cascade"))
        .args(args)
        .env_remove("BUILDKITE_BUILD_CHECKOUT_PATH")
        .env_remove("PUBLISHED_DEPENDENCIES")
        .env_remove("PUBLISHED_BUILD")
        .env_remove("BUILDKITE_AGENT_PATH")
        .env_remove("DEBUG_OUTPUT")
        .env_remove("RUST_LOG")
        .output()
        .expect("run cascade")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn sample_tree() -> tempfile::TempDir {
    let root = tempfile::tempdir().expect("tempdir");
    write(root.path(), "clusters.txt", "shared-libs = libs/core libs/extra\n");
    write(root.path(), "libs/core/dependencies.txt", "base\n");
    write(root.path(), "libs/extra/dependencies.txt", "base\n");
    write(root.path(), "teams/alpha/dependencies.txt", "base # shared base\n");
    root
}

#[test]
fn resolve_lists_targets() {
    let root = sample_tree();
    let root_arg = root.path().to_string_lossy().into_owned();
    let output = cascade(&["resolve", "--root", &root_arg, "--published", "base"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "teams/alpha\ncluster/shared-libs\n");
}

#[test]
fn resolve_reads_inputs_from_environment() {
    let root = sample_tree();
    let output = Command::new(env!("CARGO_BIN_EXE_cascade"))
        .args(["resolve", "--json"])
        .env("BUILDKITE_BUILD_CHECKOUT_PATH", root.path())
        .env("PUBLISHED_DEPENDENCIES", "unrelated base")
        .env_remove("RUST_LOG")
        .output()
        .expect("run cascade");
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(
        stdout(&output).trim(),
        r#"["teams/alpha","cluster/shared-libs"]"#
    );
}

#[test]
fn render_prints_trigger_document() {
    let root = sample_tree();
    let root_arg = root.path().to_string_lossy().into_owned();
    let output = cascade(&[
        "render",
        "--root",
        &root_arg,
        "--published",
        "base",
        "--build",
        "build-42",
    ]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let doc = stdout(&output);
    assert!(doc.contains("trigger: teams-alpha"), "got: {doc}");
    assert!(doc.contains("trigger: cluster-shared-libs"), "got: {doc}");
    assert_eq!(doc.matches("DEPENDENCY_TRIGGER: build-42").count(), 2, "got: {doc}");
}

#[test]
fn trigger_without_dependents_exits_zero_without_agent() {
    let root = sample_tree();
    let root_arg = root.path().to_string_lossy().into_owned();
    let output = cascade(&[
        "trigger",
        "--root",
        &root_arg,
        "--published",
        "unused-lib",
        "--build",
        "build-42",
        "--agent",
        "/nonexistent/agent",
    ]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("No dependent components found."));
}

#[test]
fn trigger_fails_when_agent_fails() {
    let root = sample_tree();
    let root_arg = root.path().to_string_lossy().into_owned();
    let output = cascade(&[
        "trigger",
        "--root",
        &root_arg,
        "--published",
        "base",
        "--build",
        "build-42",
        "--agent",
        "/nonexistent/agent",
    ]);
    assert!(!output.status.success());
}

#[test]
fn missing_published_names_fail_before_walking() {
    let output = cascade(&["resolve", "--root", "/nonexistent/tree"]);
    assert!(!output.status.success());
    assert!(
        stderr(&output).contains("PUBLISHED_DEPENDENCIES"),
        "stderr: {}",
        stderr(&output)
    );
}

#[test]
fn missing_build_fails_trigger() {
    let root = sample_tree();
    let root_arg = root.path().to_string_lossy().into_owned();
    let output = cascade(&["trigger", "--root", &root_arg, "--published", "base"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("PUBLISHED_BUILD"), "stderr: {}", stderr(&output));
}

#[test]
fn duplicate_membership_produces_no_document() {
    let root = sample_tree();
    write(root.path(), "libs/clusters.txt", "other = core\n");
    let root_arg = root.path().to_string_lossy().into_owned();
    let output = cascade(&[
        "render",
        "--root",
        &root_arg,
        "--published",
        "base",
        "--build",
        "build-42",
    ]);
    assert!(!output.status.success());
    assert!(stdout(&output).is_empty(), "stdout: {}", stdout(&output));
    assert!(
        stderr(&output).contains("duplicate cluster membership"),
        "stderr: {}",
        stderr(&output)
    );
}
