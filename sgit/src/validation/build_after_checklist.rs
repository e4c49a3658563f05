//! The latest build must postdate the last checklist edit.

use super::checklist::load_branch_checklist;
use super::recent_build::latest_build;
use super::{Backends, CheckError, CheckOutcome, CheckSettings, ValidationResult};
use chrono::{DateTime, Local};
use sgit_common::ValidationKind;

pub fn evaluate(build_time: DateTime<Local>, checklist_modified: DateTime<Local>) -> ValidationResult {
    ValidationResult::build_after_checklist(build_time, checklist_modified)
}

pub fn run(backends: &Backends<'_>, settings: &CheckSettings) -> Result<CheckOutcome, CheckError> {
    let cannot = |absence| CheckOutcome::CannotEvaluate {
        kind: ValidationKind::BuildAfterChecklist,
        absence,
    };

    let checklist = match load_branch_checklist(backends)? {
        Ok(checklist) => checklist,
        Err(absence) => return Ok(cannot(absence)),
    };
    let build_time = match latest_build(backends, settings)? {
        Ok(build_time) => build_time,
        Err(absence) => return Ok(cannot(absence)),
    };

    Ok(evaluate(build_time, checklist.modified).into())
}
