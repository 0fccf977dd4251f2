//! Hand-off of a rendered trigger document to the CI agent.

use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use cascade_common::error::{CascadeError, Result};

/// Something that accepts a rendered pipeline document.
pub trait Uploader {
    /// Publishes `document`.
    ///
    /// # Errors
    ///
    /// Returns an error if the document could not be handed off.
    fn upload(&self, document: &str) -> Result<()>;
}

/// Pipes the document into `<agent> pipeline upload`.
#[derive(Debug, Clone)]
pub struct AgentUploader {
    program: PathBuf,
    args: Vec<String>,
}

impl AgentUploader {
    /// Uses `program` with the standard `pipeline upload` arguments.
    #[must_use]
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: vec!["pipeline".into(), "upload".into()],
        }
    }

    /// Locates `agent` on `PATH` (or checks it directly when it contains a
    /// path separator).
    ///
    /// # Errors
    ///
    /// Returns an error if the executable cannot be found.
    pub fn locate(agent: &str) -> Result<Self> {
        let program = which::which(agent).map_err(|e| CascadeError::Upload {
            message: format!("cannot find {agent}: {e}"),
        })?;
        tracing::debug!(program = %program.display(), "located pipeline agent");
        Ok(Self::new(program))
    }

    /// Replaces the arguments passed to the program.
    #[must_use]
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Returns the program that receives the document.
    #[must_use]
    pub fn program(&self) -> &Path {
        &self.program
    }
}

impl Uploader for AgentUploader {
    fn upload(&self, document: &str) -> Result<()> {
        tracing::info!(program = %self.program.display(), args = ?self.args, "uploading trigger steps");

        let io_err = |source| CascadeError::Io {
            path: self.program.clone(),
            source,
        };

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::inherit())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(io_err)?;

        if let Some(mut stdin) = child.stdin.take() {
            match stdin.write_all(document.as_bytes()) {
                Ok(()) => {}
                // the exit status below explains why the agent stopped reading
                Err(e) if e.kind() == ErrorKind::BrokenPipe => {
                    tracing::debug!(program = %self.program.display(), "agent closed stdin early");
                }
                Err(e) => return Err(io_err(e)),
            }
        }

        let output = child.wait_with_output().map_err(io_err)?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(CascadeError::Upload {
                message: format!(
                    "{} exited with {}: {}",
                    self.program.display(),
                    output.status,
                    stderr.trim()
                ),
            });
        }
        Ok(())
    }
}
