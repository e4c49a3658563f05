//! sgit - validating front end for git.
//!
//! `sgit commit ...` and `sgit push ...` run the required validations and
//! forward to git only when they pass. Every other argument list, including
//! ones that start with git's own global flags, goes straight to git.

#![forbid(unsafe_code)]

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use is_terminal::IsTerminal;
use sgit::diagnostics::{self, DebugCommand, DiagnosticError};
use sgit::forward::Forwarder;
use sgit::invocation::{Route, route};
use sgit::orchestrator::EXIT_INTERNAL_ERROR;
use sgit::report::{render_error, render_report};
use sgit::{
    Backends, BinDirScanner, CheckSettings, FsChecklistStore, GateError, GateOutcome, GateSettings,
    GitCli, GitForwarder, Orchestrator, SystemClock,
};
use sgit_common::config::{ConfigSource, EnvParser, Sourced};
use sgit_common::util::expand_home;
use sgit_common::{
    ErrorCode, LogConfig, LoggingGuards, OperationKind, SgitConfig, init_logging, load_config,
};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, error, warn};

#[derive(Parser)]
#[command(name = "sgit")]
#[command(author, about = "Validate staging, builds and checklists before git commit/push")]
struct Cli {
    /// Repository root (default: SGIT_REPO_ROOT, then `git rev-parse --show-toplevel`)
    #[arg(long, value_name = "PATH")]
    repo: Option<PathBuf>,

    /// Configuration file (default: SGIT_CONFIG, then ~/.config/sgit/config.toml)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Enable debug logging and list passing validations
    #[arg(short, long)]
    verbose: bool,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate, then run `git commit` with the remaining arguments
    #[command(disable_help_flag = true)]
    Commit {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },

    /// Validate, then run `git push` with the remaining arguments
    #[command(disable_help_flag = true)]
    Push {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },

    /// Inspect validation inputs without running git
    #[command(subcommand)]
    Debug(DebugCommand),
}

impl Commands {
    /// The gated operation and full git argument list.
    fn git_invocation(&self) -> Option<(OperationKind, Vec<String>)> {
        let with_token = |token: &str, args: &[String]| {
            std::iter::once(token.to_string())
                .chain(args.iter().cloned())
                .collect::<Vec<_>>()
        };
        match self {
            Self::Commit { args } => Some((OperationKind::Commit, with_token("commit", args))),
            Self::Push { args } => Some((OperationKind::Push, with_token("push", args))),
            Self::Debug(_) => None,
        }
    }
}

fn main() {
    let args = std::env::args_os()
        .skip(1)
        .map(|arg| arg.to_string_lossy().into_owned())
        .collect();
    let result = match route(args) {
        Route::Own(args) => run(Cli::parse_from(std::iter::once("sgit".to_string()).chain(args))),
        Route::Passthrough(args) => passthrough(&args),
    };
    let code = match result {
        Ok(code) => code,
        Err(err) => {
            eprintln!("sgit: {err:#}");
            EXIT_INTERNAL_ERROR
        }
    };
    std::process::exit(code);
}

/// Configuration, logging and the git executable, shared by every path.
struct Runtime {
    config: SgitConfig,
    git_program: PathBuf,
    _logging_guards: LoggingGuards,
}

impl Runtime {
    /// `Ok(None)` when the configuration could not be loaded; the error has
    /// already been reported.
    fn start(config_path: Option<&Path>, verbose: bool, quiet: bool) -> Result<Option<Self>> {
        let loaded = match load_config(config_path) {
            Ok(loaded) => loaded,
            Err(err) => {
                eprintln!("{}", render_error(&err.to_string(), err.code()));
                return Ok(None);
            }
        };
        let config = loaded.config;

        let mut log_config = LogConfig::from_env(&config.general.log_level)
            .with_stderr()
            .with_ansi(io::stderr().is_terminal());
        if verbose {
            log_config = log_config.with_level("debug");
        } else if quiet {
            log_config = log_config.with_level("error");
        }
        let logging_guards = init_logging(&log_config)?;
        colored::control::set_override(
            std::env::var_os("NO_COLOR").is_none() && io::stderr().is_terminal(),
        );

        debug!(path = ?loaded.path, "configuration loaded");
        for warning in &loaded.env_warnings {
            warn!(code = %ErrorCode::ConfigEnvError, %warning, "ignoring environment override");
        }

        let git_program = which::which(&config.general.git_program).with_context(|| {
            format!(
                "[{}] cannot find git program '{}'",
                ErrorCode::GitUnavailable,
                config.general.git_program
            )
        })?;
        debug!(git = %git_program.display(), "resolved git program");

        Ok(Some(Self {
            config,
            git_program,
            _logging_guards: logging_guards,
        }))
    }
}

/// Ungated invocations reach git untouched, from the current directory.
fn passthrough(args: &[String]) -> Result<i32> {
    let Some(runtime) = Runtime::start(None, false, false)? else {
        return Ok(EXIT_INTERNAL_ERROR);
    };
    match GitForwarder::new(&runtime.git_program).forward(args) {
        Ok(code) => Ok(code),
        Err(err) => Ok(report_gate_error(&GateError::Forward(err))),
    }
}

fn run(cli: Cli) -> Result<i32> {
    let Some(runtime) = Runtime::start(cli.config.as_deref(), cli.verbose, cli.quiet)? else {
        return Ok(EXIT_INTERNAL_ERROR);
    };
    let config = &runtime.config;
    let git_program = &runtime.git_program;

    let repo_root = resolve_repo_root(cli.repo.as_deref(), git_program)?;
    debug!(root = %repo_root.value.display(), source = %repo_root.source, "repository root");

    let checklist_dir = config.checklist.resolved_directory().with_context(|| {
        format!(
            "[{}] no home directory; set checklist.directory or SGIT_CHECKLIST_DIR",
            ErrorCode::ChecklistDirUnknown
        )
    })?;
    let marker = config
        .checklist
        .marker_char()
        .with_context(|| format!("[{}] invalid done marker", ErrorCode::ConfigValidationError))?;

    let vcs = GitCli::new(git_program, &repo_root.value);
    let checklists = FsChecklistStore::new(checklist_dir, marker);
    debug!(dir = %checklists.directory().display(), %marker, "checklist store");
    let artifacts = BinDirScanner::new(
        config.validation.artifact_dir_name.clone(),
        &config.validation.artifact_extensions,
    );
    let clock = SystemClock;
    // Git must act on the repository whose state was validated
    let forwarder = GitForwarder::new(git_program).with_working_dir(&repo_root.value);

    let orchestrator = Orchestrator::new(
        gate_settings(config, repo_root.value.clone()),
        Backends {
            vcs: &vcs,
            checklists: &checklists,
            artifacts: &artifacts,
            clock: &clock,
        },
        &forwarder,
    );

    if let Commands::Debug(command) = &cli.command {
        let mut stdout = io::stdout().lock();
        return match diagnostics::run(command, &orchestrator, &mut stdout) {
            Ok(code) => Ok(code),
            Err(DiagnosticError::Gate(err)) => Ok(report_gate_error(&err)),
            Err(err) => Err(err.into()),
        };
    }

    let Some((operation, args)) = cli.command.git_invocation() else {
        return Ok(EXIT_INTERNAL_ERROR);
    };
    match orchestrator.execute(Some(operation), &args) {
        Ok(outcome) => Ok(report_outcome(&outcome, cli.verbose)),
        Err(err) => Ok(report_gate_error(&err)),
    }
}

fn gate_settings(config: &SgitConfig, repo_root: PathBuf) -> GateSettings {
    GateSettings {
        checks: CheckSettings::new(repo_root, &config.validation),
        skip_flag: config.validation.skip_flag.clone(),
    }
}

/// `--repo`, then `SGIT_REPO_ROOT`, then ask git.
fn resolve_repo_root(explicit: Option<&Path>, git_program: &Path) -> Result<Sourced<PathBuf>> {
    if let Some(repo) = explicit {
        return Ok(Sourced {
            value: expand_home(repo),
            source: ConfigSource::CommandLine,
            var_name: None,
        });
    }

    let from_env = EnvParser::new().get_optional_string("REPO_ROOT");
    if let (Some(root), Some(var)) = (&from_env.value, &from_env.var_name) {
        return Ok(Sourced::from_env(expand_home(Path::new(root)), var.clone()));
    }

    let cwd = std::env::current_dir()
        .with_context(|| format!("[{}] cannot read current directory", ErrorCode::InternalIo))?;
    let root = sgit::vcs::discover_repo_root(git_program, &cwd)
        .with_context(|| format!("[{}] not inside a git repository", ErrorCode::RepoRootNotFound))?;
    Ok(Sourced::default_value(root))
}

fn report_outcome(outcome: &GateOutcome, verbose: bool) -> i32 {
    let now = chrono::Local::now();
    match outcome {
        GateOutcome::Forwarded { exit_code, report } => {
            if let (true, Some(report)) = (verbose, report) {
                eprintln!("{}", render_report(report, now, true));
            }
            *exit_code
        }
        GateOutcome::Blocked(report) | GateOutcome::Inspected(report) => {
            eprintln!("{}", render_report(report, now, verbose));
            report.verdict().exit_code()
        }
    }
}

fn report_gate_error(err: &GateError) -> i32 {
    error!(code = %err.code(), "{err:#}");
    eprintln!("{}", render_error(&err.to_string(), err.code()));
    err.exit_code()
}
