use std::collections::BTreeSet;

use proptest::prelude::*;
use sgit::{
    Absence, ChangeKind, CheckOutcome, Evidence, FileChange, GateError, GateOutcome, SkipArgError,
    Verdict,
};
use sgit_common::{OperationKind, ValidationKind};

use crate::common::{FailingVcs, GateFixture, args, init_test_logging};

#[test]
fn scenario_a_unstaged_file_blocks_commit() {
    init_test_logging();
    crate::test_log!("TEST START: scenario_a_unstaged_file_blocks_commit");

    let mut gate = GateFixture::new();
    gate.vcs.changes = vec![FileChange::new("x.txt", ChangeKind::ModifiedInWorkdir)];
    gate.artifacts.last_build = Some(gate.minutes_ago(1));
    gate.checklists.insert("main", "done -\n", gate.minutes_ago(10));

    let outcome = gate
        .orchestrator()
        .execute(Some(OperationKind::Commit), &args(&["commit", "-m", "wip"]))
        .unwrap();

    let GateOutcome::Blocked(report) = outcome else {
        panic!("expected commit to be blocked, got {outcome:?}");
    };
    assert_eq!(report.verdict(), Verdict::Failed);
    let staging = report.outcomes[0].result().unwrap();
    assert_eq!(staging.kind(), ValidationKind::Staging);
    assert_eq!(
        staging.evidence(),
        &Evidence::UnstagedPaths {
            paths: vec!["x.txt".to_string()]
        }
    );
    assert_eq!(gate.forwarder.call_count(), 0);
    crate::test_log!("TEST PASS: scenario_a_unstaged_file_blocks_commit");
}

#[test]
fn scenario_b_clean_push_is_forwarded_without_skip_flag() {
    init_test_logging();
    crate::test_log!("TEST START: scenario_b_clean_push_is_forwarded_without_skip_flag");

    let mut gate = GateFixture::new();
    gate.vcs.changes = vec![FileChange::new("lib.rs", ChangeKind::Staged)];
    gate.artifacts.last_build = Some(gate.minutes_ago(2));
    gate.checklists
        .insert("main", "update docs -\nrun tests -\n", gate.minutes_ago(30));
    gate.forwarder.exit_code = 0;

    let raw = args(&["push", "origin", "--skip-validation", "BuildAfterChecklist", "main"]);
    let outcome = gate
        .orchestrator()
        .execute(Some(OperationKind::Push), &raw)
        .unwrap();

    match outcome {
        GateOutcome::Forwarded { exit_code, report } => {
            assert_eq!(exit_code, 0);
            let report = report.unwrap();
            assert_eq!(report.verdict(), Verdict::Passed);
            assert_eq!(report.outcomes.len(), 3);
            // not required for push, so never reported as skipped
            assert!(report.skipped.is_empty());
        }
        other => panic!("expected forward, got {other:?}"),
    }
    assert_eq!(
        gate.forwarder.last_call().unwrap(),
        args(&["push", "origin", "main"])
    );
    crate::test_log!("TEST PASS: scenario_b_clean_push_is_forwarded_without_skip_flag");
}

#[test]
fn scenario_c_skipped_checklist_is_not_read() {
    init_test_logging();
    crate::test_log!("TEST START: scenario_c_skipped_checklist_is_not_read");

    let mut gate = GateFixture::new();
    gate.artifacts.last_build = Some(gate.minutes_ago(1));

    let raw = args(&["push", "--skip-validation", "Checklist"]);
    let outcome = gate
        .orchestrator()
        .execute(Some(OperationKind::Push), &raw)
        .unwrap();

    let GateOutcome::Forwarded { report, .. } = outcome else {
        panic!("expected forward, got {outcome:?}");
    };
    let report = report.unwrap();
    assert_eq!(report.skipped, vec![ValidationKind::Checklist]);
    assert!(
        report
            .outcomes
            .iter()
            .all(|o| o.kind() != ValidationKind::Checklist)
    );
    assert_eq!(gate.forwarder.last_call().unwrap(), args(&["push"]));
    crate::test_log!("TEST PASS: scenario_c_skipped_checklist_is_not_read");
}

#[test]
fn scenario_d_checklist_edited_after_build_blocks_commit() {
    init_test_logging();
    crate::test_log!("TEST START: scenario_d_checklist_edited_after_build_blocks_commit");

    let mut gate = GateFixture::new();
    let build = gate.minutes_ago(10);
    gate.artifacts.last_build = Some(build);
    gate.checklists.insert("main", "all done -\n", gate.minutes_ago(3));

    let outcome = gate
        .orchestrator()
        .execute(Some(OperationKind::Commit), &args(&["commit"]))
        .unwrap();

    let GateOutcome::Blocked(report) = outcome else {
        panic!("expected block, got {outcome:?}");
    };
    let ordering = report
        .outcomes
        .iter()
        .find(|o| o.kind() == ValidationKind::BuildAfterChecklist)
        .and_then(CheckOutcome::result)
        .unwrap();
    assert!(!ordering.passed());
    match ordering.evidence() {
        Evidence::BuildOrdering { build_time, .. } => assert_eq!(*build_time, build),
        other => panic!("unexpected evidence {other:?}"),
    }
    assert_eq!(gate.forwarder.call_count(), 0);
    crate::test_log!("TEST PASS: scenario_d_checklist_edited_after_build_blocks_commit");
}

#[test]
fn every_required_check_runs_after_a_failure() {
    init_test_logging();
    let mut gate = GateFixture::new();
    gate.vcs.changes = vec![FileChange::new("a.txt", ChangeKind::NewInWorkdir)];
    gate.artifacts.last_build = Some(gate.minutes_ago(60));
    gate.checklists.insert("main", "todo\n", gate.minutes_ago(90));

    let report = gate
        .orchestrator()
        .evaluate(OperationKind::Push, &BTreeSet::new())
        .unwrap();

    let kinds: Vec<_> = report.outcomes.iter().map(CheckOutcome::kind).collect();
    assert_eq!(
        kinds,
        vec![
            ValidationKind::Staging,
            ValidationKind::RecentBuild,
            ValidationKind::Checklist
        ]
    );
    assert_eq!(report.problems().count(), 3);
}

#[test]
fn no_build_artifacts_cannot_be_evaluated() {
    init_test_logging();
    let mut gate = GateFixture::new();
    gate.checklists.insert("main", "ok -\n", gate.minutes_ago(5));

    let outcome = gate
        .orchestrator()
        .execute(Some(OperationKind::Push), &args(&["push"]))
        .unwrap();

    let GateOutcome::Blocked(report) = outcome else {
        panic!("expected block, got {outcome:?}");
    };
    assert_eq!(report.verdict(), Verdict::CannotEvaluate);
    let absence = report
        .outcomes
        .iter()
        .find_map(CheckOutcome::absence)
        .unwrap();
    assert!(matches!(absence, Absence::NoBuildArtifacts { dir_name, .. } if dir_name == "bin"));
}

#[test]
fn detached_head_cannot_evaluate_checklist() {
    init_test_logging();
    let mut gate = GateFixture::new();
    gate.vcs.branch = None;
    gate.artifacts.last_build = Some(gate.minutes_ago(1));

    let report = gate
        .orchestrator()
        .evaluate(OperationKind::Push, &BTreeSet::new())
        .unwrap();

    assert_eq!(report.verdict(), Verdict::CannotEvaluate);
    assert_eq!(
        report.outcomes[2],
        CheckOutcome::CannotEvaluate {
            kind: ValidationKind::Checklist,
            absence: Absence::BranchUnresolved,
        }
    );
}

#[test]
fn missing_checklist_is_distinct_from_incomplete() {
    init_test_logging();
    let mut gate = GateFixture::new();
    gate.vcs.branch = Some("feature/login".to_string());
    gate.artifacts.last_build = Some(gate.minutes_ago(1));

    let report = gate
        .orchestrator()
        .evaluate(OperationKind::Commit, &BTreeSet::new())
        .unwrap();

    match &report.outcomes[1] {
        CheckOutcome::CannotEvaluate {
            kind: ValidationKind::BuildAfterChecklist,
            absence: Absence::ChecklistNotFound { branch, path },
        } => {
            assert_eq!(branch, "feature/login");
            assert!(path.ends_with("feature/login.txt"));
        }
        other => panic!("unexpected outcome {other:?}"),
    }
}

#[test]
fn commit_without_build_artifacts_cannot_evaluate_ordering() {
    init_test_logging();
    let mut gate = GateFixture::new();
    gate.checklists.insert("main", "ok -\n", gate.minutes_ago(5));

    let outcome = gate
        .orchestrator()
        .execute(Some(OperationKind::Commit), &args(&["commit", "-m", "x"]))
        .unwrap();

    let GateOutcome::Blocked(report) = outcome else {
        panic!("expected block, got {outcome:?}");
    };
    assert_eq!(report.verdict(), Verdict::CannotEvaluate);
    match &report.outcomes[1] {
        CheckOutcome::CannotEvaluate {
            kind: ValidationKind::BuildAfterChecklist,
            absence: Absence::NoBuildArtifacts { dir_name, .. },
        } => assert_eq!(dir_name, "bin"),
        other => panic!("unexpected outcome {other:?}"),
    }
    assert_eq!(gate.forwarder.call_count(), 0);
}

#[test]
fn commit_on_detached_head_cannot_evaluate_ordering() {
    init_test_logging();
    let mut gate = GateFixture::new();
    gate.vcs.branch = None;
    gate.artifacts.last_build = Some(gate.minutes_ago(1));

    let outcome = gate
        .orchestrator()
        .execute(Some(OperationKind::Commit), &args(&["commit", "-m", "x"]))
        .unwrap();

    let GateOutcome::Blocked(report) = outcome else {
        panic!("expected block, got {outcome:?}");
    };
    assert_eq!(report.verdict(), Verdict::CannotEvaluate);
    assert_eq!(
        report.outcomes[1],
        CheckOutcome::CannotEvaluate {
            kind: ValidationKind::BuildAfterChecklist,
            absence: Absence::BranchUnresolved,
        }
    );
    assert_eq!(gate.forwarder.call_count(), 0);
}

#[test]
fn unreadable_checklist_is_an_error_not_an_absence() {
    init_test_logging();
    let mut gate = GateFixture::new();
    gate.checklists.unreadable = true;
    gate.artifacts.last_build = Some(gate.minutes_ago(1));

    let err = gate
        .orchestrator()
        .execute(Some(OperationKind::Commit), &args(&["commit"]))
        .unwrap_err();
    assert!(matches!(err, GateError::Check(_)));
    assert_eq!(err.exit_code(), sgit::orchestrator::EXIT_INTERNAL_ERROR);
    assert_eq!(gate.forwarder.call_count(), 0);
}

#[test]
fn artifact_scan_failure_propagates() {
    init_test_logging();
    let mut gate = GateFixture::new();
    gate.artifacts.fail = true;

    let err = gate
        .orchestrator()
        .evaluate(OperationKind::Push, &BTreeSet::new())
        .unwrap_err();
    assert_eq!(err.code(), sgit_common::ErrorCode::BuildScanFailed);
}

#[test]
fn ungated_command_is_forwarded_verbatim() {
    init_test_logging();
    let gate = GateFixture::new();
    let raw = args(&["log", "--oneline", "--skip-validation", "Nonsense"]);

    let outcome = gate.orchestrator().execute(None, &raw).unwrap();

    assert_eq!(
        outcome,
        GateOutcome::Forwarded {
            exit_code: 0,
            report: None
        }
    );
    assert_eq!(gate.forwarder.last_call().unwrap(), raw);
    assert_eq!(gate.vcs.status_calls.get(), 0);
}

#[test]
fn malformed_skip_value_is_rejected_before_any_check() {
    init_test_logging();
    let gate = GateFixture::new();

    let err = gate
        .orchestrator()
        .execute(
            Some(OperationKind::Push),
            &args(&["push", "--skip-validation", "checklist"]),
        )
        .unwrap_err();

    assert!(matches!(
        err,
        GateError::MalformedInput(SkipArgError::UnknownKind { .. })
    ));
    assert_eq!(gate.vcs.status_calls.get(), 0);
    assert_eq!(gate.forwarder.call_count(), 0);
}

#[test]
fn forwarded_exit_code_is_echoed() {
    init_test_logging();
    let mut gate = GateFixture::new();
    gate.forwarder.exit_code = 128;

    let outcome = gate
        .orchestrator()
        .execute(
            Some(OperationKind::Commit),
            &args(&["commit", "--skip-validation", "Staging BuildAfterChecklist"]),
        )
        .unwrap();

    assert!(matches!(outcome, GateOutcome::Forwarded { exit_code: 128, .. }));
}

#[test]
fn diagnostic_runs_all_checks_and_never_forwards() {
    init_test_logging();
    let mut gate = GateFixture::new();
    gate.artifacts.last_build = Some(gate.minutes_ago(1));
    gate.checklists.insert("main", "ok -\n", gate.minutes_ago(5));

    let outcome = gate
        .orchestrator()
        .execute(Some(OperationKind::Diagnostic), &[])
        .unwrap();

    let GateOutcome::Inspected(report) = outcome else {
        panic!("expected inspection, got {outcome:?}");
    };
    assert_eq!(report.verdict(), Verdict::Passed);
    assert_eq!(report.outcomes.len(), 4);
    assert_eq!(gate.forwarder.call_count(), 0);
}

#[test]
fn repeated_runs_give_identical_reports() {
    init_test_logging();
    let mut gate = GateFixture::new();
    gate.vcs.changes = vec![
        FileChange::new("z.txt", ChangeKind::ModifiedInWorkdir),
        FileChange::new("a.txt", ChangeKind::NewInWorkdir),
    ];
    gate.artifacts.last_build = Some(gate.minutes_ago(20));
    gate.checklists.insert("main", "b\na\nc -\n", gate.minutes_ago(30));

    let orchestrator = gate.orchestrator();
    let first = orchestrator
        .evaluate(OperationKind::Diagnostic, &BTreeSet::new())
        .unwrap();
    let second = orchestrator
        .evaluate(OperationKind::Diagnostic, &BTreeSet::new())
        .unwrap();
    assert_eq!(first, second);
}

fn operation() -> impl Strategy<Value = OperationKind> {
    prop_oneof![
        Just(OperationKind::Commit),
        Just(OperationKind::Push),
        Just(OperationKind::Diagnostic),
    ]
}

proptest! {
    #[test]
    fn skipping_every_required_check_always_forwards(
        op in operation().prop_filter("diagnostic never forwards", |op| *op != OperationKind::Diagnostic),
        extra in prop::collection::vec(0usize..4, 0..4),
    ) {
        let gate = GateFixture::new();
        let mut skip: BTreeSet<ValidationKind> =
            sgit::policy::required_validations(op).iter().copied().collect();
        skip.extend(extra.into_iter().map(|i| ValidationKind::ALL[i]));
        let names: Vec<&str> = skip.iter().map(|k| k.as_str()).collect();

        let raw = vec![op.as_str().to_string(), "--skip-validation".to_string(), names.join(" ")];
        // any check that did run would hit the failing backend
        let orchestrator = gate.orchestrator_with_vcs(&FailingVcs);
        let outcome = orchestrator.execute(Some(op), &raw).unwrap();

        prop_assert!(
            matches!(outcome, GateOutcome::Forwarded { .. }),
            "expected forward, got {:?}",
            outcome
        );
        prop_assert_eq!(gate.forwarder.last_call().unwrap(), vec![op.as_str().to_string()]);
    }
}
