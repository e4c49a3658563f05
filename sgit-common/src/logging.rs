//! Logging setup shared by sgit binaries.
//!
//! Human-readable events go to stderr. When `SGIT_LOG_FILE` is set, the
//! same events are also appended to that file as JSON lines.

use std::path::PathBuf;
use thiserror::Error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

/// Full `EnvFilter` directive, e.g. `sgit=debug,warn`.
pub const LOG_FILTER_ENV: &str = "SGIT_LOG";
/// Optional JSON log file.
pub const LOG_FILE_ENV: &str = "SGIT_LOG_FILE";

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("invalid log filter '{directive}': {source}")]
    InvalidFilter {
        directive: String,
        #[source]
        source: tracing_subscriber::filter::ParseError,
    },

    #[error("log file path has no file name: {}", .0.display())]
    InvalidLogFile(PathBuf),

    #[error("failed to create log directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("a global tracing subscriber is already installed")]
    AlreadyInitialized,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Level used when no explicit filter directive is present.
    pub level: String,
    /// Explicit `EnvFilter` directive; wins over `level`.
    pub filter: Option<String>,
    /// Emit human-readable events on stderr.
    pub stderr: bool,
    /// Use ANSI colors on stderr.
    pub ansi: bool,
    /// Append JSON events to this file.
    pub file: Option<PathBuf>,
}

impl LogConfig {
    /// Build from `SGIT_LOG` / `SGIT_LOG_FILE`, falling back to `default_level`.
    pub fn from_env(default_level: &str) -> Self {
        let filter = std::env::var(LOG_FILTER_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty());
        let file = std::env::var_os(LOG_FILE_ENV)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);
        Self {
            level: default_level.to_string(),
            filter,
            stderr: false,
            ansi: false,
            file,
        }
    }

    /// Force a level, discarding any filter taken from the environment.
    pub fn with_level(mut self, level: &str) -> Self {
        self.level = level.to_string();
        self.filter = None;
        self
    }

    pub fn with_stderr(mut self) -> Self {
        self.stderr = true;
        self
    }

    pub fn with_ansi(mut self, ansi: bool) -> Self {
        self.ansi = ansi;
        self
    }

    /// The directive handed to `EnvFilter`.
    pub fn directive(&self) -> &str {
        self.filter.as_deref().unwrap_or(&self.level)
    }
}

/// Keeps background log writers alive; drop at process exit.
#[must_use = "dropping the guards stops file logging"]
pub struct LoggingGuards {
    _file: Option<WorkerGuard>,
}

/// Install the global subscriber described by `config`.
pub fn init_logging(config: &LogConfig) -> Result<LoggingGuards, LoggingError> {
    let directive = config.directive().to_string();
    let filter = EnvFilter::try_new(&directive)
        .map_err(|source| LoggingError::InvalidFilter { directive, source })?;

    let stderr_layer = config.stderr.then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(config.ansi)
            .with_target(false)
            .without_time()
            .compact()
    });

    let mut guard = None;
    let file_layer = match &config.file {
        Some(path) => {
            let file_name = path
                .file_name()
                .ok_or_else(|| LoggingError::InvalidLogFile(path.clone()))?;
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("."));
            std::fs::create_dir_all(&dir).map_err(|source| LoggingError::CreateDir {
                path: dir.clone(),
                source,
            })?;
            let appender = tracing_appender::rolling::never(&dir, file_name);
            let (writer, worker_guard) = tracing_appender::non_blocking(appender);
            guard = Some(worker_guard);
            Some(
                fmt::layer()
                    .json()
                    .with_writer(writer)
                    .with_current_span(true)
                    .with_file(true)
                    .with_line_number(true),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .map_err(|_| LoggingError::AlreadyInitialized)?;

    Ok(LoggingGuards { _file: guard })
}
