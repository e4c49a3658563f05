//! Common types used across sgit components.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

/// One of the named precondition checks.
///
/// Names are matched case-sensitively when they appear on the command line
/// (`--skip-validation "Checklist RecentBuild"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ValidationKind {
    /// Every working-tree change is staged.
    Staging,
    /// A build artifact was written within the freshness window.
    RecentBuild,
    /// Every item of the branch checklist is marked done.
    Checklist,
    /// The latest build postdates the last checklist edit.
    BuildAfterChecklist,
}

impl ValidationKind {
    /// All kinds, in declaration order.
    pub const ALL: [ValidationKind; 4] = [
        Self::Staging,
        Self::RecentBuild,
        Self::Checklist,
        Self::BuildAfterChecklist,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Staging => "Staging",
            Self::RecentBuild => "RecentBuild",
            Self::Checklist => "Checklist",
            Self::BuildAfterChecklist => "BuildAfterChecklist",
        }
    }
}

impl fmt::Display for ValidationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A name that is not one of the [`ValidationKind`] variants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown validation kind '{0}' (expected one of: Staging, RecentBuild, Checklist, BuildAfterChecklist)")]
pub struct UnknownValidationKind(pub String);

impl FromStr for ValidationKind {
    type Err = UnknownValidationKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownValidationKind(s.to_string()))
    }
}

/// The gated action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    Commit,
    Push,
    /// Internal inspection run (`sgit debug validate`); never forwarded.
    Diagnostic,
}

impl OperationKind {
    /// Map the first git argument to a gated operation.
    ///
    /// Only `commit` and `push` are gated; every other token is forwarded
    /// untouched, so this returns `None` for it.
    pub fn from_command(token: &str) -> Option<Self> {
        match token.to_ascii_lowercase().as_str() {
            "commit" => Some(Self::Commit),
            "push" => Some(Self::Push),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Commit => "commit",
            Self::Push => "push",
            Self::Diagnostic => "diagnostic",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// sgit configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SgitConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub validation: ValidationConfig,
    #[serde(default)]
    pub checklist: ChecklistConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Program invoked for status queries and for forwarding.
    #[serde(default = "default_git_program")]
    pub git_program: String,
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            git_program: default_git_program(),
            log_level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Argument that names the validations to bypass for one invocation.
    #[serde(default = "default_skip_flag")]
    pub skip_flag: String,
    /// A build counts as recent when it is strictly younger than this.
    #[serde(default = "default_recent_build_window_secs")]
    pub recent_build_window_secs: u64,
    /// Directory name that marks build output anywhere under the repository.
    #[serde(default = "default_artifact_dir_name")]
    pub artifact_dir_name: String,
    /// File extensions (without the dot) that count as build artifacts.
    #[serde(default = "default_artifact_extensions")]
    pub artifact_extensions: Vec<String>,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            skip_flag: default_skip_flag(),
            recent_build_window_secs: default_recent_build_window_secs(),
            artifact_dir_name: default_artifact_dir_name(),
            artifact_extensions: default_artifact_extensions(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChecklistConfig {
    /// Directory holding `<branch>.txt` checklists. `None` means `~/CheckLists`.
    #[serde(default)]
    pub directory: Option<PathBuf>,
    /// Trailing character that marks a checklist line as done.
    #[serde(default = "default_done_marker")]
    pub done_marker: String,
}

impl Default for ChecklistConfig {
    fn default() -> Self {
        Self {
            directory: None,
            done_marker: default_done_marker(),
        }
    }
}

impl ChecklistConfig {
    /// The configured directory, or `<home>/CheckLists`.
    pub fn resolved_directory(&self) -> Option<PathBuf> {
        match &self.directory {
            Some(dir) => Some(crate::util::expand_home(dir)),
            None => dirs::home_dir().map(|home| home.join(DEFAULT_CHECKLIST_DIR_NAME)),
        }
    }

    /// The done marker as a single character.
    pub fn marker_char(&self) -> Option<char> {
        let mut chars = self.done_marker.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Some(c),
            _ => None,
        }
    }
}

/// Directory under the home directory that holds branch checklists.
pub const DEFAULT_CHECKLIST_DIR_NAME: &str = "CheckLists";

fn default_git_program() -> String {
    "git".to_string()
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_skip_flag() -> String {
    "--skip-validation".to_string()
}

fn default_recent_build_window_secs() -> u64 {
    300
}

fn default_artifact_dir_name() -> String {
    "bin".to_string()
}

fn default_artifact_extensions() -> Vec<String> {
    vec![
        "dll".to_string(),
        "exe".to_string(),
        "so".to_string(),
        "dylib".to_string(),
    ]
}

fn default_done_marker() -> String {
    "-".to_string()
}
