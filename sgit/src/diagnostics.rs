//! `sgit debug ...`: inspection commands that never forward to git.

use crate::orchestrator::{
    EXIT_CANNOT_EVALUATE, EXIT_SUCCESS, EXIT_VALIDATION_FAILED, GateError, GateOutcome, GateReport,
    Orchestrator, Verdict,
};
use crate::report::{render_outcome, render_report};
use crate::skip::extract_skips;
use crate::validation::{CheckError, CheckOutcome, checklist, recent_build, staging};
use clap::Subcommand;
use serde::Serialize;
use sgit_common::OperationKind;
use sgit_common::util::quote_args;
use std::io::{self, Write};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum DebugCommand {
    /// List working-tree entries with their change kinds
    Status {
        /// Also run the Staging validation
        #[arg(long)]
        validation: bool,
    },

    /// Print the current branch
    Branch,

    /// Run the RecentBuild validation
    Buildtime,

    /// Run the Checklist validation
    Checklist,

    /// Run every validation without forwarding
    Validate {
        /// Print the report as JSON
        #[arg(long)]
        json: bool,

        /// Arguments to read the skip flag from
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },

    /// Show how the skip flag is parsed out of an argument list
    SkipArgs {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
}

#[derive(Debug, Error)]
pub enum DiagnosticError {
    #[error(transparent)]
    Gate(#[from] GateError),

    #[error("failed to write output: {0}")]
    Output(#[from] io::Error),

    #[error("failed to encode report: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<CheckError> for DiagnosticError {
    fn from(err: CheckError) -> Self {
        Self::Gate(GateError::Check(err))
    }
}

#[derive(Serialize)]
struct ValidateJson<'a> {
    verdict: Verdict,
    #[serde(flatten)]
    report: &'a GateReport,
}

fn outcome_exit_code(outcome: &CheckOutcome) -> i32 {
    match outcome {
        CheckOutcome::CannotEvaluate { .. } => EXIT_CANNOT_EVALUATE,
        CheckOutcome::Evaluated(result) if result.passed() => EXIT_SUCCESS,
        CheckOutcome::Evaluated(_) => EXIT_VALIDATION_FAILED,
    }
}

/// Run one diagnostic command and return the process exit code.
pub fn run(
    command: &DebugCommand,
    orchestrator: &Orchestrator<'_>,
    out: &mut dyn Write,
) -> Result<i32, DiagnosticError> {
    let backends = orchestrator.backends();
    let settings = orchestrator.settings();
    let now = backends.clock.now();

    match command {
        DebugCommand::Status { validation } => {
            let changes = backends.vcs.working_tree_changes().map_err(CheckError::from)?;
            if changes.is_empty() {
                writeln!(out, "working tree clean")?;
            }
            for change in &changes {
                writeln!(out, "{:<24} {}", change.kind.as_str(), change.path)?;
            }
            if !validation {
                return Ok(EXIT_SUCCESS);
            }
            let outcome = staging::run(backends)?;
            writeln!(out, "{}", render_outcome(&outcome, now, true))?;
            Ok(outcome_exit_code(&outcome))
        }
        DebugCommand::Branch => {
            let branch = backends.vcs.current_branch().map_err(CheckError::from)?;
            writeln!(out, "{}", branch.as_deref().unwrap_or("(detached HEAD)"))?;
            Ok(EXIT_SUCCESS)
        }
        DebugCommand::Buildtime => {
            let outcome = recent_build::run(backends, &settings.checks)?;
            writeln!(out, "{}", render_outcome(&outcome, now, true))?;
            Ok(outcome_exit_code(&outcome))
        }
        DebugCommand::Checklist => {
            let outcome = checklist::run(backends)?;
            writeln!(out, "{}", render_outcome(&outcome, now, true))?;
            Ok(outcome_exit_code(&outcome))
        }
        DebugCommand::Validate { json, args } => {
            let report = match orchestrator.execute(Some(OperationKind::Diagnostic), args)? {
                GateOutcome::Inspected(report) | GateOutcome::Blocked(report) => report,
                GateOutcome::Forwarded { exit_code, .. } => return Ok(exit_code),
            };
            let verdict = report.verdict();
            if *json {
                let body = ValidateJson {
                    verdict,
                    report: &report,
                };
                writeln!(out, "{}", serde_json::to_string_pretty(&body)?)?;
            } else {
                writeln!(out, "{}", render_report(&report, now, true))?;
            }
            Ok(verdict.exit_code())
        }
        DebugCommand::SkipArgs { args } => {
            let extraction = extract_skips(args, &settings.skip_flag).map_err(GateError::from)?;
            let skipped: Vec<&str> = extraction.skipped.iter().map(|k| k.as_str()).collect();
            writeln!(
                out,
                "skip: {}",
                if skipped.is_empty() {
                    "(none)".to_string()
                } else {
                    skipped.join(" ")
                }
            )?;
            writeln!(out, "args: {}", quote_args(&extraction.args))?;
            Ok(EXIT_SUCCESS)
        }
    }
}
