//! Human-readable rendering of gate results.
//!
//! Every blocked run names the failing validation and its concrete evidence,
//! so the user can fix things without re-running in a debug mode.

use crate::orchestrator::{GateReport, Verdict};
use crate::validation::{Absence, CheckOutcome, Evidence};
use chrono::{DateTime, Local};
use colored::Colorize;
use sgit_common::ErrorCode;
use sgit_common::util::{humanize_duration, indent_lines};
use std::fmt::Write;

const EVIDENCE_INDENT: &str = "      ";

/// `2026-10-17 14:03:11 (4m 12s ago)`.
pub fn format_timestamp(time: DateTime<Local>, now: DateTime<Local>) -> String {
    let stamp = time.format("%Y-%m-%d %H:%M:%S");
    let age = now.signed_duration_since(time).num_seconds();
    if age < 0 {
        format!("{stamp} (in the future)")
    } else {
        format!("{stamp} ({} ago)", humanize_duration(age.unsigned_abs()))
    }
}

fn summary(outcome: &CheckOutcome) -> String {
    match outcome {
        CheckOutcome::CannotEvaluate { absence, .. } => format!("cannot evaluate: {absence}"),
        CheckOutcome::Evaluated(result) if result.passed() => "passed".to_string(),
        CheckOutcome::Evaluated(result) => match result.evidence() {
            Evidence::UnstagedPaths { paths } => match paths.len() {
                1 => "1 path has unstaged changes".to_string(),
                n => format!("{n} paths have unstaged changes"),
            },
            Evidence::BuildTimestamp { .. } => "last build is too old".to_string(),
            Evidence::IncompleteItems { items } => match items.len() {
                1 => "1 checklist item is not done".to_string(),
                n => format!("{n} checklist items are not done"),
            },
            Evidence::BuildOrdering { .. } => "checklist was edited after the last build".to_string(),
        },
    }
}

fn evidence_lines(evidence: &Evidence, now: DateTime<Local>) -> String {
    match evidence {
        Evidence::UnstagedPaths { paths } => paths.join("\n"),
        Evidence::IncompleteItems { items } => items.join("\n"),
        Evidence::BuildTimestamp { build_time } => {
            format!("last build: {}", format_timestamp(*build_time, now))
        }
        Evidence::BuildOrdering {
            build_time,
            checklist_modified,
        } => format!(
            "last build:     {}\nchecklist edit: {}",
            format_timestamp(*build_time, now),
            format_timestamp(*checklist_modified, now)
        ),
    }
}

fn remediation(code: ErrorCode) -> String {
    code.entry().format_full()
}

fn absence_lines(absence: &Absence) -> String {
    remediation(absence.code())
}

/// One check's report: a status line plus indented evidence.
///
/// Evidence of passing checks is shown only when `verbose`.
pub fn render_outcome(outcome: &CheckOutcome, now: DateTime<Local>, verbose: bool) -> String {
    let kind = outcome.kind().to_string();
    let mut out = match outcome {
        CheckOutcome::Evaluated(result) if result.passed() => {
            format!("  {} {}: {}", "✓".green(), kind.bold(), summary(outcome))
        }
        CheckOutcome::Evaluated(_) => {
            format!("  {} {}: {}", "✗".red(), kind.bold(), summary(outcome))
        }
        CheckOutcome::CannotEvaluate { .. } => {
            format!("  {} {}: {}", "?".yellow(), kind.bold(), summary(outcome))
        }
    };

    let details = match outcome {
        CheckOutcome::Evaluated(result) if result.passed() && !verbose => String::new(),
        CheckOutcome::Evaluated(result) => evidence_lines(result.evidence(), now),
        CheckOutcome::CannotEvaluate { absence, .. } => absence_lines(absence),
    };
    if !details.is_empty() {
        out.push('\n');
        out.push_str(&indent_lines(details.trim_end(), EVIDENCE_INDENT));
    }
    out
}

fn headline(report: &GateReport) -> String {
    let operation = report.operation;
    let problems = report.problems().count();
    match report.verdict() {
        Verdict::Passed => format!("{} {operation}: all validations passed", "✓".green()),
        Verdict::Failed => format!(
            "{} {operation} blocked: {problems} validation{} failed",
            "✗".red(),
            if problems == 1 { "" } else { "s" }
        ),
        Verdict::CannotEvaluate => format!(
            "{} {operation} blocked: validation could not be evaluated",
            "✗".red()
        ),
    }
}

/// Full report for a gate run.
///
/// Passing checks are listed only when `verbose`; failures always are.
pub fn render_report(report: &GateReport, now: DateTime<Local>, verbose: bool) -> String {
    let mut out = headline(report);
    for outcome in &report.outcomes {
        if verbose || !outcome.passed() {
            let _ = write!(out, "\n{}", render_outcome(outcome, now, verbose));
        }
    }
    for kind in &report.skipped {
        let _ = write!(out, "\n  {} {}: skipped", "-".dimmed(), kind.to_string().bold());
    }
    out
}

/// An error with its catalog entry, for errors that abort the run.
pub fn render_error(message: &str, code: ErrorCode) -> String {
    format!(
        "{} {message}\n{}",
        "error:".red().bold(),
        indent_lines(remediation(code).trim_end(), "  ")
    )
}
