//! Config file discovery, environment overrides, and validation.

use super::env::{EnvError, EnvParser};
use crate::errors::ErrorCode;
use crate::types::SgitConfig;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Environment variable naming an explicit config file.
pub const CONFIG_PATH_ENV: &str = "SGIT_CONFIG";

/// Longest accepted freshness window (one day).
pub const MAX_BUILD_WINDOW_SECS: u64 = 86_400;

/// Errors that stop configuration from loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid configuration: {}", problems.join("; "))]
    Invalid { problems: Vec<String> },
}

impl ConfigError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::NotFound { .. } => ErrorCode::ConfigNotFound,
            Self::Read { .. } => ErrorCode::ConfigReadError,
            Self::Parse { .. } => ErrorCode::ConfigParseError,
            Self::Invalid { .. } => ErrorCode::ConfigValidationError,
        }
    }
}

/// A loaded configuration and how it was assembled.
#[derive(Debug)]
pub struct LoadedConfig {
    pub config: SgitConfig,
    /// The file that was read, if any.
    pub path: Option<PathBuf>,
    /// Environment overrides that were ignored because they were invalid.
    pub env_warnings: Vec<EnvError>,
}

/// Default config location: `<config_dir>/sgit/config.toml`.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("sgit").join("config.toml"))
}

/// Load configuration.
///
/// An explicit path (argument, then `SGIT_CONFIG`) must exist. The default
/// location is optional and falls back to built-in defaults.
pub fn load_config(explicit: Option<&Path>) -> Result<LoadedConfig, ConfigError> {
    let env_path = std::env::var_os(CONFIG_PATH_ENV)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from);

    let (path, required) = match (explicit, env_path) {
        (Some(path), _) => (Some(path.to_path_buf()), true),
        (None, Some(path)) => (Some(path), true),
        (None, None) => (default_config_path(), false),
    };

    let mut config = match &path {
        Some(path) if path.exists() => read_config_file(path)?,
        Some(path) if required => return Err(ConfigError::NotFound { path: path.clone() }),
        _ => SgitConfig::default(),
    };
    let used_path = path.filter(|p| p.exists());
    debug!(path = ?used_path, "configuration file resolved");

    let env_warnings = apply_env_overrides(&mut config);
    validate_config(&config)?;

    Ok(LoadedConfig {
        config,
        path: used_path,
        env_warnings,
    })
}

/// Parse a TOML config file.
pub fn read_config_file(path: &Path) -> Result<SgitConfig, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Apply `SGIT_*` overrides in place, returning the rejected ones.
pub fn apply_env_overrides(config: &mut SgitConfig) -> Vec<EnvError> {
    let mut parser = EnvParser::new();

    if let Some(program) = parser
        .get_string("GIT_PROGRAM", &config.general.git_program)
        .env_override()
    {
        config.general.git_program = program;
    }
    if let Some(level) = parser
        .get_log_level("LOG_LEVEL", &config.general.log_level)
        .env_override()
    {
        config.general.log_level = level;
    }
    if let Some(flag) = parser
        .get_string("SKIP_FLAG", &config.validation.skip_flag)
        .env_override()
    {
        config.validation.skip_flag = flag;
    }
    if let Some(secs) = parser
        .get_u64_range(
            "BUILD_WINDOW_SECS",
            config.validation.recent_build_window_secs,
            1,
            MAX_BUILD_WINDOW_SECS,
        )
        .env_override()
    {
        config.validation.recent_build_window_secs = secs;
    }
    if let Some(extensions) = parser
        .get_string_list(
            "ARTIFACT_EXTENSIONS",
            config.validation.artifact_extensions.clone(),
        )
        .env_override()
    {
        config.validation.artifact_extensions = extensions;
    }
    let current_dir = config.checklist.directory.clone().unwrap_or_default();
    if let Some(dir) = parser.get_path("CHECKLIST_DIR", &current_dir).env_override() {
        config.checklist.directory = Some(dir);
    }

    parser.take_errors()
}

/// Reject configurations the gate cannot run with.
pub fn validate_config(config: &SgitConfig) -> Result<(), ConfigError> {
    let mut problems = Vec::new();

    if config.general.git_program.trim().is_empty() {
        problems.push("general.git_program must not be empty".to_string());
    }
    if config.validation.skip_flag.trim().is_empty() {
        problems.push("validation.skip_flag must not be empty".to_string());
    }
    if config.validation.recent_build_window_secs == 0 {
        problems.push("validation.recent_build_window_secs must be greater than zero".to_string());
    }
    if config.validation.recent_build_window_secs > MAX_BUILD_WINDOW_SECS {
        problems.push(format!(
            "validation.recent_build_window_secs must be at most {MAX_BUILD_WINDOW_SECS}"
        ));
    }
    if config.validation.artifact_dir_name.trim().is_empty() {
        problems.push("validation.artifact_dir_name must not be empty".to_string());
    }
    if config.checklist.marker_char().is_none() {
        problems.push(format!(
            "checklist.done_marker must be exactly one character, got '{}'",
            config.checklist.done_marker
        ));
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::Invalid { problems })
    }
}
