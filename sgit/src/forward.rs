//! Forwarding the (cleaned) invocation to git.

use sgit_common::ErrorCode;
use sgit_common::util::quote_args;
use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
#[error("failed to start {program}: {source}")]
pub struct ForwardError {
    pub program: String,
    #[source]
    pub source: std::io::Error,
}

impl ForwardError {
    pub fn code(&self) -> ErrorCode {
        ErrorCode::ForwardFailed
    }
}

/// Runs the downstream tool with the given arguments and reports its exit code.
pub trait Forwarder {
    fn forward(&self, args: &[String]) -> Result<i32, ForwardError>;
}

/// Spawns git with inherited stdio and blocks until it exits.
#[derive(Debug, Clone)]
pub struct GitForwarder {
    program: PathBuf,
    working_dir: Option<PathBuf>,
}

impl GitForwarder {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            working_dir: None,
        }
    }

    /// Run git from `dir` instead of the current directory.
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }
}

impl Forwarder for GitForwarder {
    fn forward(&self, args: &[String]) -> Result<i32, ForwardError> {
        info!(program = %self.program.display(), args = %quote_args(args), "forwarding to git");

        let mut command = Command::new(&self.program);
        command.args(args);
        if let Some(dir) = &self.working_dir {
            command.current_dir(dir);
        }

        let status = command.status().map_err(|source| ForwardError {
            program: self.program.display().to_string(),
            source,
        })?;
        debug!(?status, "git exited");

        // Killed by a signal: no exit code to echo
        Ok(status.code().unwrap_or(1))
    }
}
