//! Validation results and the four precondition checks.
//!
//! Each check is a plain function that takes collaborator data and returns a
//! [`CheckOutcome`]. A check that cannot even be evaluated because something
//! it needs does not exist (no branch, no checklist, no build) reports
//! [`CheckOutcome::CannotEvaluate`] instead of a pass or a fail.

pub mod build_after_checklist;
pub mod checklist;
pub mod recent_build;
pub mod staging;

use crate::artifacts::ArtifactScanner;
use crate::checklist_store::{ChecklistError, ChecklistStore};
use crate::clock::Clock;
use crate::vcs::{VcsError, VersionControl};
use chrono::{DateTime, Local, TimeDelta};
use serde::Serialize;
use sgit_common::{ErrorCode, ValidationConfig, ValidationKind};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;
use tracing::debug;

/// External state the checks read.
#[derive(Clone, Copy)]
pub struct Backends<'a> {
    pub vcs: &'a dyn VersionControl,
    pub checklists: &'a dyn ChecklistStore,
    pub artifacts: &'a dyn ArtifactScanner,
    pub clock: &'a dyn Clock,
}

/// Injected parameters shared by the checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckSettings {
    pub repo_root: PathBuf,
    /// Directory name that marks build output; used in absence reports.
    pub artifact_dir_name: String,
    pub recent_build_window: TimeDelta,
}

impl CheckSettings {
    pub fn new(repo_root: impl Into<PathBuf>, validation: &ValidationConfig) -> Self {
        let secs = i64::try_from(validation.recent_build_window_secs).unwrap_or(i64::MAX);
        Self {
            repo_root: repo_root.into(),
            artifact_dir_name: validation.artifact_dir_name.clone(),
            recent_build_window: TimeDelta::try_seconds(secs).unwrap_or(TimeDelta::MAX),
        }
    }
}

/// Unexpected failures while gathering check inputs.
///
/// Expected absences never surface here; they become
/// [`CheckOutcome::CannotEvaluate`].
#[derive(Debug, Error)]
pub enum CheckError {
    #[error(transparent)]
    Vcs(#[from] VcsError),

    #[error(transparent)]
    Checklist(ChecklistError),

    #[error("build artifact scan under {} failed: {source}", root.display())]
    ArtifactScan {
        root: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CheckError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Vcs(err) => err.code(),
            Self::Checklist(err) => err.code(),
            Self::ArtifactScan { .. } => ErrorCode::BuildScanFailed,
        }
    }
}

/// Run the check for `kind`.
pub fn run_check(
    kind: ValidationKind,
    backends: &Backends<'_>,
    settings: &CheckSettings,
) -> Result<CheckOutcome, CheckError> {
    debug!(%kind, "running validation");
    match kind {
        ValidationKind::Staging => staging::run(backends),
        ValidationKind::RecentBuild => recent_build::run(backends, settings),
        ValidationKind::Checklist => checklist::run(backends),
        ValidationKind::BuildAfterChecklist => build_after_checklist::run(backends, settings),
    }
}

/// Evidence attached to a [`ValidationResult`], selected by kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Evidence {
    /// Working-tree paths with unstaged changes, in status order.
    UnstagedPaths { paths: Vec<String> },
    /// Most recent build artifact time.
    BuildTimestamp { build_time: DateTime<Local> },
    /// Checklist items not ending in the done marker, in file order.
    IncompleteItems { items: Vec<String> },
    /// Most recent build artifact time, and the checklist edit it must postdate.
    BuildOrdering {
        build_time: DateTime<Local>,
        checklist_modified: DateTime<Local>,
    },
}

/// Typed outcome of one evaluated check.
///
/// Only the per-kind constructors build values, so `passed` always agrees
/// with the evidence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    kind: ValidationKind,
    passed: bool,
    evidence: Evidence,
}

impl ValidationResult {
    /// Passed iff no path is unstaged.
    pub fn staging(unstaged: Vec<String>) -> Self {
        Self {
            kind: ValidationKind::Staging,
            passed: unstaged.is_empty(),
            evidence: Evidence::UnstagedPaths { paths: unstaged },
        }
    }

    /// Passed iff the build is strictly younger than `window` at `now`.
    pub fn recent_build(
        build_time: DateTime<Local>,
        now: DateTime<Local>,
        window: TimeDelta,
    ) -> Self {
        Self {
            kind: ValidationKind::RecentBuild,
            passed: now.signed_duration_since(build_time) < window,
            evidence: Evidence::BuildTimestamp { build_time },
        }
    }

    /// Passed iff every item is done.
    pub fn checklist(incomplete: Vec<String>) -> Self {
        Self {
            kind: ValidationKind::Checklist,
            passed: incomplete.is_empty(),
            evidence: Evidence::IncompleteItems { items: incomplete },
        }
    }

    /// Passed iff the checklist was last edited strictly before the build.
    pub fn build_after_checklist(
        build_time: DateTime<Local>,
        checklist_modified: DateTime<Local>,
    ) -> Self {
        Self {
            kind: ValidationKind::BuildAfterChecklist,
            passed: checklist_modified < build_time,
            evidence: Evidence::BuildOrdering {
                build_time,
                checklist_modified,
            },
        }
    }

    pub fn kind(&self) -> ValidationKind {
        self.kind
    }

    pub fn passed(&self) -> bool {
        self.passed
    }

    pub fn evidence(&self) -> &Evidence {
        &self.evidence
    }
}

/// Something a check needs that is missing from the repository or environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Absence {
    /// HEAD does not point at a branch.
    BranchUnresolved,
    /// No checklist file exists for the branch.
    ChecklistNotFound { branch: String, path: PathBuf },
    /// No build artifact exists under the repository root.
    NoBuildArtifacts { root: PathBuf, dir_name: String },
}

impl Absence {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::BranchUnresolved => ErrorCode::BranchUnresolved,
            Self::ChecklistNotFound { .. } => ErrorCode::ChecklistNotFound,
            Self::NoBuildArtifacts { .. } => ErrorCode::BuildArtifactsMissing,
        }
    }
}

impl fmt::Display for Absence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BranchUnresolved => write!(f, "HEAD is detached; no current branch"),
            Self::ChecklistNotFound { branch, path } => write!(
                f,
                "no checklist for branch '{}' at {}",
                branch,
                path.display()
            ),
            Self::NoBuildArtifacts { root, dir_name } => write!(
                f,
                "no build artifacts in any '{}' directory under {}",
                dir_name,
                root.display()
            ),
        }
    }
}

/// What running one check produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CheckOutcome {
    Evaluated(ValidationResult),
    CannotEvaluate {
        kind: ValidationKind,
        absence: Absence,
    },
}

impl CheckOutcome {
    pub fn kind(&self) -> ValidationKind {
        match self {
            Self::Evaluated(result) => result.kind(),
            Self::CannotEvaluate { kind, .. } => *kind,
        }
    }

    /// Only an evaluated, passing result counts as passed.
    pub fn passed(&self) -> bool {
        matches!(self, Self::Evaluated(result) if result.passed())
    }

    pub fn result(&self) -> Option<&ValidationResult> {
        match self {
            Self::Evaluated(result) => Some(result),
            Self::CannotEvaluate { .. } => None,
        }
    }

    pub fn absence(&self) -> Option<&Absence> {
        match self {
            Self::Evaluated(_) => None,
            Self::CannotEvaluate { absence, .. } => Some(absence),
        }
    }
}

impl From<ValidationResult> for CheckOutcome {
    fn from(result: ValidationResult) -> Self {
        Self::Evaluated(result)
    }
}
