//! Runs the required checks for an operation and decides whether to forward.
//!
//! `extract skips -> look up policy -> run each required, non-skipped check ->
//! forward or block`. Every required check runs even after one fails, so the
//! report names every problem at once. Unexpected I/O errors stop the run.

use crate::forward::{ForwardError, Forwarder};
use crate::policy::required_validations;
use crate::skip::{SkipArgError, extract_skips};
use crate::validation::{Backends, CheckError, CheckOutcome, CheckSettings, run_check};
use serde::Serialize;
use sgit_common::{ErrorCode, OperationKind, ValidationKind};
use std::collections::BTreeSet;
use thiserror::Error;
use tracing::{debug, info, warn};

pub const EXIT_SUCCESS: i32 = 0;
/// Unexpected errors (git unavailable, I/O failures).
pub const EXIT_INTERNAL_ERROR: i32 = 1;
pub const EXIT_VALIDATION_FAILED: i32 = 2;
/// A required check had nothing to evaluate (no branch, checklist or build).
pub const EXIT_CANNOT_EVALUATE: i32 = 3;
pub const EXIT_MALFORMED_INPUT: i32 = 4;

/// Parameters injected at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateSettings {
    pub checks: CheckSettings,
    /// Flag whose value lists the validations to skip.
    pub skip_flag: String,
}

#[derive(Debug, Error)]
pub enum GateError {
    #[error(transparent)]
    MalformedInput(#[from] SkipArgError),

    #[error(transparent)]
    Check(#[from] CheckError),

    #[error(transparent)]
    Forward(#[from] ForwardError),
}

impl GateError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::MalformedInput(err) => err.code(),
            Self::Check(err) => err.code(),
            Self::Forward(err) => err.code(),
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            Self::MalformedInput(_) => EXIT_MALFORMED_INPUT,
            Self::Check(_) | Self::Forward(_) => EXIT_INTERNAL_ERROR,
        }
    }
}

/// Overall result of a gate run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Passed,
    Failed,
    CannotEvaluate,
}

impl Verdict {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Passed => EXIT_SUCCESS,
            Self::Failed => EXIT_VALIDATION_FAILED,
            Self::CannotEvaluate => EXIT_CANNOT_EVALUATE,
        }
    }
}

/// Everything one gate run found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GateReport {
    pub operation: OperationKind,
    /// Executed checks, in policy order.
    pub outcomes: Vec<CheckOutcome>,
    /// Required kinds that were skipped on request.
    pub skipped: Vec<ValidationKind>,
}

impl GateReport {
    pub fn verdict(&self) -> Verdict {
        if self.outcomes.iter().any(|o| o.absence().is_some()) {
            Verdict::CannotEvaluate
        } else if self.outcomes.iter().all(CheckOutcome::passed) {
            Verdict::Passed
        } else {
            Verdict::Failed
        }
    }

    pub fn passed(&self) -> bool {
        self.verdict() == Verdict::Passed
    }

    /// Outcomes that did not pass.
    pub fn problems(&self) -> impl Iterator<Item = &CheckOutcome> {
        self.outcomes.iter().filter(|o| !o.passed())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateOutcome {
    /// Git ran; `report` is `None` for ungated commands.
    Forwarded {
        exit_code: i32,
        report: Option<GateReport>,
    },
    /// Validation did not pass; git was not started.
    Blocked(GateReport),
    /// Diagnostic runs are evaluated but never forwarded.
    Inspected(GateReport),
}

pub struct Orchestrator<'a> {
    settings: GateSettings,
    backends: Backends<'a>,
    forwarder: &'a dyn Forwarder,
}

impl<'a> Orchestrator<'a> {
    pub fn new(settings: GateSettings, backends: Backends<'a>, forwarder: &'a dyn Forwarder) -> Self {
        Self {
            settings,
            backends,
            forwarder,
        }
    }

    pub fn settings(&self) -> &GateSettings {
        &self.settings
    }

    pub fn backends(&self) -> &Backends<'a> {
        &self.backends
    }

    /// Run the checks `operation` requires, minus `skipped`.
    pub fn evaluate(
        &self,
        operation: OperationKind,
        skipped: &BTreeSet<ValidationKind>,
    ) -> Result<GateReport, GateError> {
        let mut report = GateReport {
            operation,
            outcomes: Vec::new(),
            skipped: Vec::new(),
        };

        for &kind in required_validations(operation) {
            if skipped.contains(&kind) {
                info!(%operation, %kind, "validation skipped on request");
                report.skipped.push(kind);
                continue;
            }

            let outcome = run_check(kind, &self.backends, &self.settings.checks)?;
            match &outcome {
                CheckOutcome::CannotEvaluate { absence, .. } => {
                    warn!(%operation, %kind, %absence, "validation cannot be evaluated");
                }
                CheckOutcome::Evaluated(result) if !result.passed() => {
                    warn!(%operation, %kind, evidence = ?result.evidence(), "validation failed");
                }
                CheckOutcome::Evaluated(_) => debug!(%operation, %kind, "validation passed"),
            }
            report.outcomes.push(outcome);
        }

        Ok(report)
    }

    /// Gate and, when allowed, forward one invocation.
    ///
    /// `args` is the full git argument list including the command token.
    /// Ungated commands (`operation == None`) are forwarded verbatim.
    pub fn execute(
        &self,
        operation: Option<OperationKind>,
        args: &[String],
    ) -> Result<GateOutcome, GateError> {
        let Some(operation) = operation else {
            let exit_code = self.forwarder.forward(args)?;
            return Ok(GateOutcome::Forwarded {
                exit_code,
                report: None,
            });
        };

        let extraction = extract_skips(args, &self.settings.skip_flag)?;
        let report = self.evaluate(operation, &extraction.skipped)?;

        if operation == OperationKind::Diagnostic {
            return Ok(GateOutcome::Inspected(report));
        }
        if !report.passed() {
            info!(%operation, verdict = ?report.verdict(), "not forwarding");
            return Ok(GateOutcome::Blocked(report));
        }

        let exit_code = self.forwarder.forward(&extraction.args)?;
        Ok(GateOutcome::Forwarded {
            exit_code,
            report: Some(report),
        })
    }
}
