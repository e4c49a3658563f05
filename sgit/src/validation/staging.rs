//! Every working-tree change must be staged.

use super::{Backends, CheckError, CheckOutcome, ValidationResult};
use crate::vcs::FileChange;

/// Paths with unstaged changes, in listing order.
pub fn evaluate(changes: &[FileChange]) -> ValidationResult {
    let unstaged = changes
        .iter()
        .filter(|change| change.kind.is_unstaged())
        .map(|change| change.path.clone())
        .collect();
    ValidationResult::staging(unstaged)
}

pub fn run(backends: &Backends<'_>) -> Result<CheckOutcome, CheckError> {
    let changes = backends.vcs.working_tree_changes()?;
    Ok(evaluate(&changes).into())
}
