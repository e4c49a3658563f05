//! Version-control backend: working-tree status and current branch.
//!
//! The gate only needs two questions answered, so [`VersionControl`] is the
//! seam tests replace with an in-memory fake. [`GitCli`] answers them by
//! running git in the repository root.

use serde::Serialize;
use sgit_common::ErrorCode;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;
use tracing::debug;

/// State of one working-tree entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    /// Untracked file.
    NewInWorkdir,
    ModifiedInWorkdir,
    DeletedFromWorkdir,
    TypeChangeInWorkdir,
    RenamedInWorkdir,
    /// Change recorded in the index with a clean worktree column.
    Staged,
    /// Unmerged path.
    Conflicted,
    Ignored,
}

impl ChangeKind {
    /// Whether this change still has to be staged before committing.
    pub fn is_unstaged(&self) -> bool {
        matches!(
            self,
            Self::NewInWorkdir
                | Self::ModifiedInWorkdir
                | Self::DeletedFromWorkdir
                | Self::TypeChangeInWorkdir
                | Self::RenamedInWorkdir
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NewInWorkdir => "new in workdir",
            Self::ModifiedInWorkdir => "modified in workdir",
            Self::DeletedFromWorkdir => "deleted from workdir",
            Self::TypeChangeInWorkdir => "type changed in workdir",
            Self::RenamedInWorkdir => "renamed in workdir",
            Self::Staged => "staged",
            Self::Conflicted => "conflicted",
            Self::Ignored => "ignored",
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of the working-tree status listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileChange {
    pub path: String,
    pub kind: ChangeKind,
}

impl FileChange {
    pub fn new(path: impl Into<String>, kind: ChangeKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }
}

/// Errors from querying the version-control backend.
#[derive(Debug, Error)]
pub enum VcsError {
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` exited with status {status}: {stderr}")]
    CommandFailed {
        command: String,
        status: i32,
        stderr: String,
    },

    #[error("unexpected output from `{command}`: {detail}")]
    Malformed { command: String, detail: String },
}

impl VcsError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Spawn { .. } => ErrorCode::GitUnavailable,
            Self::CommandFailed { .. } => ErrorCode::GitCommandFailed,
            Self::Malformed { .. } => ErrorCode::GitOutputMalformed,
        }
    }
}

/// The two repository queries the gate depends on.
pub trait VersionControl {
    /// Working-tree entries in the backend's listing order.
    fn working_tree_changes(&self) -> Result<Vec<FileChange>, VcsError>;

    /// Current branch name, or `None` when HEAD is detached.
    fn current_branch(&self) -> Result<Option<String>, VcsError>;
}

/// [`VersionControl`] backed by the git command line.
#[derive(Debug, Clone)]
pub struct GitCli {
    program: PathBuf,
    repo_root: PathBuf,
}

impl GitCli {
    pub fn new(program: impl Into<PathBuf>, repo_root: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            repo_root: repo_root.into(),
        }
    }

    fn command_line(args: &[&str]) -> String {
        format!("git {}", args.join(" "))
    }

    fn output(&self, args: &[&str]) -> Result<std::process::Output, VcsError> {
        debug!(command = %Self::command_line(args), root = %self.repo_root.display(), "querying git");
        Command::new(&self.program)
            .args(args)
            .current_dir(&self.repo_root)
            .output()
            .map_err(|source| VcsError::Spawn {
                program: self.program.display().to_string(),
                source,
            })
    }

    fn run(&self, args: &[&str]) -> Result<Vec<u8>, VcsError> {
        let out = self.output(args)?;
        if !out.status.success() {
            return Err(VcsError::CommandFailed {
                command: Self::command_line(args),
                status: out.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&out.stderr).trim().to_string(),
            });
        }
        Ok(out.stdout)
    }
}

impl VersionControl for GitCli {
    fn working_tree_changes(&self) -> Result<Vec<FileChange>, VcsError> {
        let args = ["status", "--porcelain=v1", "-z", "--untracked-files=all"];
        let stdout = self.run(&args)?;
        parse_porcelain_z(&stdout).map_err(|detail| VcsError::Malformed {
            command: Self::command_line(&args),
            detail,
        })
    }

    fn current_branch(&self) -> Result<Option<String>, VcsError> {
        let args = ["symbolic-ref", "--quiet", "--short", "HEAD"];
        let out = self.output(&args)?;
        if out.status.success() {
            let name = String::from_utf8_lossy(&out.stdout).trim().to_string();
            return Ok((!name.is_empty()).then_some(name));
        }

        // --quiet: a detached HEAD exits non-zero without printing anything
        let stderr = String::from_utf8_lossy(&out.stderr).trim().to_string();
        if stderr.is_empty() {
            Ok(None)
        } else {
            Err(VcsError::CommandFailed {
                command: Self::command_line(&args),
                status: out.status.code().unwrap_or(-1),
                stderr,
            })
        }
    }
}

/// Locate the top of the working tree containing `start`.
pub fn discover_repo_root(program: &Path, start: &Path) -> Result<PathBuf, VcsError> {
    let git = GitCli::new(program, start);
    let stdout = git.run(&["rev-parse", "--show-toplevel"])?;
    let root = String::from_utf8_lossy(&stdout).trim().to_string();
    if root.is_empty() {
        return Err(VcsError::Malformed {
            command: "git rev-parse --show-toplevel".to_string(),
            detail: "empty output".to_string(),
        });
    }
    Ok(PathBuf::from(root))
}

/// Classify a porcelain v1 `XY` status pair.
pub fn classify_status(x: u8, y: u8) -> ChangeKind {
    match (x, y) {
        (b'?', b'?') => ChangeKind::NewInWorkdir,
        (b'!', b'!') => ChangeKind::Ignored,
        (b'D', b'D') | (b'A', b'A') | (b'U', _) | (_, b'U') => ChangeKind::Conflicted,
        (_, b'M') => ChangeKind::ModifiedInWorkdir,
        (_, b'D') => ChangeKind::DeletedFromWorkdir,
        (_, b'T') => ChangeKind::TypeChangeInWorkdir,
        (_, b'R') => ChangeKind::RenamedInWorkdir,
        _ => ChangeKind::Staged,
    }
}

/// Parse `git status --porcelain=v1 -z` output.
///
/// Records are `XY path\0`; rename and copy records are followed by an extra
/// `origin\0` field which is consumed and dropped.
pub fn parse_porcelain_z(output: &[u8]) -> Result<Vec<FileChange>, String> {
    let mut changes = Vec::new();
    let mut fields = output.split(|b| *b == 0).filter(|f| !f.is_empty());

    while let Some(record) = fields.next() {
        if record.len() < 4 || record[2] != b' ' {
            return Err(format!(
                "malformed status record '{}'",
                String::from_utf8_lossy(record)
            ));
        }
        let (x, y) = (record[0], record[1]);
        let path = String::from_utf8_lossy(&record[3..]).into_owned();
        if matches!(x, b'R' | b'C') || matches!(y, b'R' | b'C') {
            fields
                .next()
                .ok_or_else(|| format!("rename record for '{path}' has no origin path"))?;
        }
        changes.push(FileChange::new(path, classify_status(x, y)));
    }

    Ok(changes)
}
