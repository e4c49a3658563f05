//! Every item of the current branch's checklist must be marked done.

use super::{Absence, Backends, CheckError, CheckOutcome, ValidationResult};
use crate::checklist_store::{Checklist, ChecklistError};
use sgit_common::ValidationKind;

pub fn evaluate(checklist: &Checklist) -> ValidationResult {
    ValidationResult::checklist(checklist.incomplete())
}

/// Resolve the branch and load its checklist.
///
/// A detached HEAD or a missing file is an [`Absence`]; only read failures
/// other than "not found" are errors.
pub fn load_branch_checklist(
    backends: &Backends<'_>,
) -> Result<Result<Checklist, Absence>, CheckError> {
    let Some(branch) = backends.vcs.current_branch()? else {
        return Ok(Err(Absence::BranchUnresolved));
    };
    match backends.checklists.read_checklist(&branch) {
        Ok(checklist) => Ok(Ok(checklist)),
        Err(ChecklistError::NotFound { branch, path }) => {
            Ok(Err(Absence::ChecklistNotFound { branch, path }))
        }
        Err(err) => Err(CheckError::Checklist(err)),
    }
}

pub fn run(backends: &Backends<'_>) -> Result<CheckOutcome, CheckError> {
    let outcome = match load_branch_checklist(backends)? {
        Ok(checklist) => evaluate(&checklist).into(),
        Err(absence) => CheckOutcome::CannotEvaluate {
            kind: ValidationKind::Checklist,
            absence,
        },
    };
    Ok(outcome)
}
