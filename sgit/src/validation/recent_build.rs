//! The most recent build must be younger than the freshness window.

use super::{Absence, Backends, CheckError, CheckOutcome, CheckSettings, ValidationResult};
use chrono::{DateTime, Local, TimeDelta};
use sgit_common::ValidationKind;

pub fn evaluate(
    build_time: DateTime<Local>,
    now: DateTime<Local>,
    window: TimeDelta,
) -> ValidationResult {
    ValidationResult::recent_build(build_time, now, window)
}

/// Newest artifact time under the repository root.
///
/// The outer `Result` carries scan failures; the inner one is `Err` when
/// there is nothing to scan, which callers turn into `CannotEvaluate`.
pub fn latest_build(
    backends: &Backends<'_>,
    settings: &CheckSettings,
) -> Result<Result<DateTime<Local>, Absence>, CheckError> {
    let root = &settings.repo_root;
    let newest = backends
        .artifacts
        .last_build_time(root)
        .map_err(|source| CheckError::ArtifactScan {
            root: root.clone(),
            source,
        })?;
    Ok(newest.ok_or_else(|| Absence::NoBuildArtifacts {
        root: root.clone(),
        dir_name: settings.artifact_dir_name.clone(),
    }))
}

pub fn run(backends: &Backends<'_>, settings: &CheckSettings) -> Result<CheckOutcome, CheckError> {
    let outcome = match latest_build(backends, settings)? {
        Ok(build_time) => evaluate(
            build_time,
            backends.clock.now(),
            settings.recent_build_window,
        )
        .into(),
        Err(absence) => CheckOutcome::CannotEvaluate {
            kind: ValidationKind::RecentBuild,
            absence,
        },
    };
    Ok(outcome)
}
