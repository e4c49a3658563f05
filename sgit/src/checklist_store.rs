//! Per-branch checklist files.
//!
//! A checklist lives at `<dir>/<branch>.txt`, one item per line. An item is
//! done when its last character is the done marker (`-` unless configured
//! otherwise).

use chrono::{DateTime, Local};
use serde::Serialize;
use sgit_common::ErrorCode;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// One checklist line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChecklistItem {
    pub text: String,
    pub done: bool,
}

/// A loaded branch checklist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Checklist {
    pub path: PathBuf,
    pub items: Vec<ChecklistItem>,
    /// Last modification time of the checklist file.
    pub modified: DateTime<Local>,
}

impl Checklist {
    /// Texts of items that are not done, in file order.
    pub fn incomplete(&self) -> Vec<String> {
        self.items
            .iter()
            .filter(|item| !item.done)
            .map(|item| item.text.clone())
            .collect()
    }
}

#[derive(Debug, Error)]
pub enum ChecklistError {
    #[error("no checklist for branch '{branch}' at {}", path.display())]
    NotFound { branch: String, path: PathBuf },

    #[error("failed to read checklist {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ChecklistError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::NotFound { .. } => ErrorCode::ChecklistNotFound,
            Self::Io { .. } => ErrorCode::ChecklistReadError,
        }
    }
}

/// Source of branch checklists.
pub trait ChecklistStore {
    /// Load the checklist for `branch`; `NotFound` when it does not exist.
    fn read_checklist(&self, branch: &str) -> Result<Checklist, ChecklistError>;
}

/// Checklists stored as text files in one directory.
#[derive(Debug, Clone)]
pub struct FsChecklistStore {
    directory: PathBuf,
    done_marker: char,
}

impl FsChecklistStore {
    pub fn new(directory: impl Into<PathBuf>, done_marker: char) -> Self {
        Self {
            directory: directory.into(),
            done_marker,
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Deterministic file location for a branch.
    pub fn path_for(&self, branch: &str) -> PathBuf {
        self.directory.join(format!("{branch}.txt"))
    }
}

impl ChecklistStore for FsChecklistStore {
    fn read_checklist(&self, branch: &str) -> Result<Checklist, ChecklistError> {
        let path = self.path_for(branch);
        debug!(branch, path = %path.display(), "reading checklist");

        let io_err = |source: io::Error, path: &Path| {
            if source.kind() == io::ErrorKind::NotFound {
                ChecklistError::NotFound {
                    branch: branch.to_string(),
                    path: path.to_path_buf(),
                }
            } else {
                ChecklistError::Io {
                    path: path.to_path_buf(),
                    source,
                }
            }
        };

        let contents = std::fs::read_to_string(&path).map_err(|e| io_err(e, &path))?;
        let modified = std::fs::metadata(&path)
            .and_then(|meta| meta.modified())
            .map_err(|e| io_err(e, &path))?;

        Ok(Checklist {
            items: parse_checklist(&contents, self.done_marker),
            path,
            modified: DateTime::<Local>::from(modified),
        })
    }
}

/// Parse checklist text.
///
/// Only a trailing `\r` is removed, so CRLF files behave and whitespace after
/// the marker leaves an item incomplete. Empty lines are not items.
pub fn parse_checklist(contents: &str, done_marker: char) -> Vec<ChecklistItem> {
    contents
        .lines()
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .filter(|line| !line.is_empty())
        .map(|line| ChecklistItem {
            text: line.to_string(),
            done: line.ends_with(done_marker),
        })
        .collect()
}
