use std::process::Command;

use crate::common::{assert_contains, init_test_logging};

#[test]
fn test_sgit_debug_help_lists_diagnostics() {
    init_test_logging();
    crate::test_log!("TEST START: test_sgit_debug_help_lists_diagnostics");

    let output = Command::new(env!("CARGO_BIN_EXE_sgit"))
        .args(["debug", "--help"])
        .output()
        .expect("Failed to run sgit debug --help");

    assert!(output.status.success(), "sgit debug --help failed");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_contains(&stdout, "buildtime");
    assert_contains(&stdout, "checklist");
    crate::test_log!("TEST PASS: test_sgit_debug_help_lists_diagnostics");
}

#[cfg(unix)]
mod end_to_end {
    use serial_test::serial;
    use std::time::Duration;

    use crate::common::{TestRepo, args, assert_contains, assert_not_contains, init_test_logging};

    const MINUTE: Duration = Duration::from_secs(60);

    fn stderr(output: &std::process::Output) -> String {
        String::from_utf8_lossy(&output.stderr).into_owned()
    }

    /// Clean tree, fresh build, finished checklist edited before the build.
    fn ready_repo() -> TestRepo {
        let repo = TestRepo::new();
        repo.set_status(&[]);
        repo.write_checklist("main", "update docs -\nrun tests -\n", 10 * MINUTE);
        repo.write_artifact("bin/app.exe", MINUTE);
        repo
    }

    #[test]
    #[serial]
    fn unstaged_file_blocks_commit() {
        init_test_logging();
        crate::test_log!("TEST START: unstaged_file_blocks_commit");

        let repo = ready_repo();
        repo.set_status(&[" M x.txt"]);

        let output = repo.sgit(&["commit", "-m", "wip"]);

        assert_eq!(output.status.code(), Some(2), "{}", stderr(&output));
        let err = stderr(&output);
        assert_contains(&err, "commit blocked: 1 validation failed");
        assert_contains(&err, "x.txt");
        assert!(repo.forwarded().is_none(), "git must not be started");
        crate::test_log!("TEST PASS: unstaged_file_blocks_commit");
    }

    #[test]
    #[serial]
    fn passing_push_forwards_original_arguments() {
        init_test_logging();
        let repo = ready_repo();

        let output = repo.sgit(&["push", "origin", "main", "--force-with-lease"]);

        assert_eq!(output.status.code(), Some(0), "{}", stderr(&output));
        assert_eq!(
            repo.forwarded().unwrap(),
            args(&["push", "origin", "main", "--force-with-lease"])
        );
    }

    #[test]
    #[serial]
    fn skip_flag_is_stripped_before_forwarding() {
        init_test_logging();
        let repo = TestRepo::new();
        repo.set_status(&[]);
        repo.write_artifact("bin/app.exe", MINUTE);

        let output = repo.sgit(&["push", "--skip-validation", "Checklist", "origin"]);

        assert_eq!(output.status.code(), Some(0), "{}", stderr(&output));
        assert_eq!(repo.forwarded().unwrap(), args(&["push", "origin"]));
    }

    #[test]
    #[serial]
    fn ungated_command_echoes_git_exit_code() {
        init_test_logging();
        let repo = TestRepo::new();
        repo.set_git_exit_code(5);

        let output = repo.sgit(&["log", "--oneline", "-3"]);

        assert_eq!(output.status.code(), Some(5));
        assert_eq!(repo.forwarded().unwrap(), args(&["log", "--oneline", "-3"]));
    }

    #[test]
    #[serial]
    fn leading_git_global_flag_is_forwarded() {
        init_test_logging();
        crate::test_log!("TEST START: leading_git_global_flag_is_forwarded");

        let repo = TestRepo::new();

        let output = repo.sgit(&["--no-pager", "log"]);

        assert_eq!(output.status.code(), Some(0), "{}", stderr(&output));
        assert_eq!(repo.forwarded().unwrap(), args(&["--no-pager", "log"]));
        crate::test_log!("TEST PASS: leading_git_global_flag_is_forwarded");
    }

    #[test]
    #[serial]
    fn version_and_config_flags_reach_git() {
        init_test_logging();
        let repo = TestRepo::new();

        let output = repo.sgit(&["--version"]);
        assert_eq!(output.status.code(), Some(0), "{}", stderr(&output));
        assert_eq!(repo.forwarded().unwrap(), args(&["--version"]));

        let output = repo.sgit(&["-c", "core.pager=cat", "status", "-s"]);
        assert_eq!(output.status.code(), Some(0), "{}", stderr(&output));
        assert_eq!(
            repo.forwarded().unwrap(),
            args(&["-c", "core.pager=cat", "status", "-s"])
        );
    }

    #[test]
    #[serial]
    fn gated_commit_runs_git_in_validated_root() {
        init_test_logging();
        crate::test_log!("TEST START: gated_commit_runs_git_in_validated_root");

        let repo = ready_repo();
        let elsewhere = repo.dir.path().join("elsewhere");
        std::fs::create_dir_all(&elsewhere).unwrap();

        let output = repo.sgit_in(&elsewhere, &["commit", "-m", "x"]);

        assert_eq!(output.status.code(), Some(0), "{}", stderr(&output));
        assert_eq!(repo.forwarded().unwrap(), args(&["commit", "-m", "x"]));
        assert_eq!(
            repo.forwarded_cwd().unwrap(),
            std::fs::canonicalize(&repo.root).unwrap()
        );
        crate::test_log!("TEST PASS: gated_commit_runs_git_in_validated_root");
    }

    #[test]
    #[serial]
    fn uppercase_command_is_still_gated() {
        init_test_logging();
        let repo = ready_repo();
        repo.set_status(&[" M x.txt"]);

        let output = repo.sgit(&["COMMIT", "-m", "wip"]);

        assert_eq!(output.status.code(), Some(2), "{}", stderr(&output));
        assert!(repo.forwarded().is_none());
    }

    #[test]
    #[serial]
    fn help_after_commit_reaches_git() {
        init_test_logging();
        let repo = ready_repo();

        let output = repo.sgit(&["commit", "--help"]);

        assert_eq!(output.status.code(), Some(0), "{}", stderr(&output));
        assert_eq!(repo.forwarded().unwrap(), args(&["commit", "--help"]));
    }

    #[test]
    #[serial]
    fn unknown_skip_name_is_malformed_input() {
        init_test_logging();
        let repo = ready_repo();

        let output = repo.sgit(&["push", "--skip-validation", "checklist"]);

        assert_eq!(output.status.code(), Some(4));
        let err = stderr(&output);
        assert_contains(&err, "SGIT-E400");
        assert_contains(&err, "checklist");
        assert!(repo.forwarded().is_none());
    }

    #[test]
    #[serial]
    fn missing_build_cannot_be_evaluated() {
        init_test_logging();
        let repo = TestRepo::new();
        repo.set_status(&[]);
        repo.write_checklist("main", "done -\n", MINUTE);

        let output = repo.sgit(&["push"]);

        assert_eq!(output.status.code(), Some(3));
        let err = stderr(&output);
        assert_contains(&err, "cannot evaluate");
        assert_contains(&err, "SGIT-E300");
        assert!(repo.forwarded().is_none());
    }

    #[test]
    #[serial]
    fn detached_head_blocks_push() {
        init_test_logging();
        let repo = ready_repo();
        repo.set_branch(None);

        let output = repo.sgit(&["push"]);

        assert_eq!(output.status.code(), Some(3));
        assert_contains(&stderr(&output), "HEAD is detached");
    }

    #[test]
    #[serial]
    fn quiet_run_still_prints_report() {
        init_test_logging();
        let repo = ready_repo();
        repo.write_artifact("bin/app.exe", 30 * MINUTE);

        let output = repo.sgit(&["--quiet", "push"]);

        assert_eq!(output.status.code(), Some(2));
        let err = stderr(&output);
        assert_contains(&err, "last build is too old");
        assert_not_contains(&err, "WARN");
    }

    #[test]
    #[serial]
    fn debug_branch_prints_branch() {
        init_test_logging();
        let repo = TestRepo::new();
        repo.set_branch(Some("feature/login"));

        let output = repo.sgit(&["debug", "branch"]);

        assert!(output.status.success(), "{}", stderr(&output));
        assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "feature/login");
    }

    #[test]
    #[serial]
    fn debug_validate_json() {
        init_test_logging();
        let repo = ready_repo();

        let output = repo.sgit(&["debug", "validate", "--json"]);

        assert!(output.status.success(), "{}", stderr(&output));
        let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(json["verdict"], "passed");
        assert_eq!(json["outcomes"].as_array().unwrap().len(), 4);
    }

    #[test]
    #[serial]
    fn broken_config_file_is_reported() {
        init_test_logging();
        let repo = TestRepo::new();
        std::fs::write(&repo.config, "[validation\nskip_flag = ").unwrap();

        let output = repo.sgit(&["status"]);

        assert_eq!(output.status.code(), Some(1));
        assert_contains(&stderr(&output), "SGIT-E003");
        assert!(repo.forwarded().is_none());
    }
}
