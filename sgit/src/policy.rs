//! Which validations each gated operation requires.

use sgit_common::{OperationKind, ValidationKind};

/// Required validations for `operation`, in the order they run.
pub fn required_validations(operation: OperationKind) -> &'static [ValidationKind] {
    match operation {
        OperationKind::Commit => &[ValidationKind::Staging, ValidationKind::BuildAfterChecklist],
        OperationKind::Push => &[
            ValidationKind::Staging,
            ValidationKind::RecentBuild,
            ValidationKind::Checklist,
        ],
        OperationKind::Diagnostic => &ValidationKind::ALL,
    }
}
