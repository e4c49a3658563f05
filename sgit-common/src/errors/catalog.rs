//! Error Catalog for sgit
//!
//! Every condition that stops a gated operation without being an ordinary
//! validation failure gets a stable code, a message, and remediation steps.
//!
//! # Error Code Ranges
//!
//! | Range      | Category    | Description                              |
//! |------------|-------------|------------------------------------------|
//! | E001-E099  | Config      | Configuration file and environment       |
//! | E100-E199  | Repository  | Git invocation and repository state      |
//! | E200-E299  | Checklist   | Branch checklist store                   |
//! | E300-E399  | Build       | Build artifact discovery                 |
//! | E400-E499  | Input       | Malformed command-line input             |
//! | E500-E599  | Internal    | Forwarding and unexpected errors         |

use serde::{Deserialize, Serialize};
use std::fmt;

/// Error code enumeration covering every sgit error scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum ErrorCode {
    // =========================================================================
    // Config Errors (E001-E099)
    // =========================================================================
    /// Explicitly requested configuration file does not exist
    ConfigNotFound,
    /// Configuration file could not be read
    ConfigReadError,
    /// Configuration file contains invalid TOML syntax
    ConfigParseError,
    /// Configuration contains invalid values
    ConfigValidationError,
    /// Environment variable has invalid value
    ConfigEnvError,

    // =========================================================================
    // Repository Errors (E100-E199)
    // =========================================================================
    /// Git executable could not be started
    GitUnavailable,
    /// Git exited unsuccessfully while being queried
    GitCommandFailed,
    /// Git output did not have the expected shape
    GitOutputMalformed,
    /// No repository root could be determined
    RepoRootNotFound,
    /// HEAD does not point at a branch
    BranchUnresolved,

    // =========================================================================
    // Checklist Errors (E200-E299)
    // =========================================================================
    /// No checklist file exists for the current branch
    ChecklistNotFound,
    /// Checklist file exists but could not be read
    ChecklistReadError,
    /// Checklist directory could not be determined
    ChecklistDirUnknown,

    // =========================================================================
    // Build Errors (E300-E399)
    // =========================================================================
    /// No build artifacts exist under the repository root
    BuildArtifactsMissing,
    /// Walking the repository for build artifacts failed
    BuildScanFailed,

    // =========================================================================
    // Input Errors (E400-E499)
    // =========================================================================
    /// Skip flag value names an unknown validation
    SkipValueInvalid,
    /// Skip flag is the last argument and has no value
    SkipValueMissing,

    // =========================================================================
    // Internal Errors (E500-E599)
    // =========================================================================
    /// Forwarding to git failed to start
    ForwardFailed,
    /// Unexpected filesystem error
    InternalIo,
}

/// Subsystem an error code belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Configuration file and environment setup errors (E001-E099)
    Config,
    /// Git invocation and repository state errors (E100-E199)
    Repository,
    /// Branch checklist store errors (E200-E299)
    Checklist,
    /// Build artifact discovery errors (E300-E399)
    Build,
    /// Malformed command-line input (E400-E499)
    Input,
    /// Forwarding and unexpected errors (E500-E599)
    Internal,
}

impl ErrorCategory {
    /// Returns a human-readable name for the category.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Config => "Configuration",
            Self::Repository => "Repository",
            Self::Checklist => "Checklist",
            Self::Build => "Build",
            Self::Input => "Input",
            Self::Internal => "Internal",
        }
    }
}

impl ErrorCode {
    /// All error codes, in numeric order.
    pub fn all() -> &'static [ErrorCode] {
        &[
            Self::ConfigNotFound,
            Self::ConfigReadError,
            Self::ConfigParseError,
            Self::ConfigValidationError,
            Self::ConfigEnvError,
            Self::GitUnavailable,
            Self::GitCommandFailed,
            Self::GitOutputMalformed,
            Self::RepoRootNotFound,
            Self::BranchUnresolved,
            Self::ChecklistNotFound,
            Self::ChecklistReadError,
            Self::ChecklistDirUnknown,
            Self::BuildArtifactsMissing,
            Self::BuildScanFailed,
            Self::SkipValueInvalid,
            Self::SkipValueMissing,
            Self::ForwardFailed,
            Self::InternalIo,
        ]
    }

    /// Returns the numeric part of the code.
    #[must_use]
    pub const fn code_number(&self) -> u16 {
        match self {
            Self::ConfigNotFound => 1,
            Self::ConfigReadError => 2,
            Self::ConfigParseError => 3,
            Self::ConfigValidationError => 4,
            Self::ConfigEnvError => 5,

            Self::GitUnavailable => 100,
            Self::GitCommandFailed => 101,
            Self::GitOutputMalformed => 102,
            Self::RepoRootNotFound => 103,
            Self::BranchUnresolved => 104,

            Self::ChecklistNotFound => 200,
            Self::ChecklistReadError => 201,
            Self::ChecklistDirUnknown => 202,

            Self::BuildArtifactsMissing => 300,
            Self::BuildScanFailed => 301,

            Self::SkipValueInvalid => 400,
            Self::SkipValueMissing => 401,

            Self::ForwardFailed => 500,
            Self::InternalIo => 501,
        }
    }

    /// Returns the formatted code, e.g. `SGIT-E200`.
    pub fn code_string(&self) -> String {
        format!("SGIT-E{:03}", self.code_number())
    }

    /// Returns the error category.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self.code_number() {
            1..=99 => ErrorCategory::Config,
            100..=199 => ErrorCategory::Repository,
            200..=299 => ErrorCategory::Checklist,
            300..=399 => ErrorCategory::Build,
            400..=499 => ErrorCategory::Input,
            _ => ErrorCategory::Internal,
        }
    }

    /// Returns the full error entry with all metadata.
    pub fn entry(&self) -> ErrorEntry {
        ErrorEntry {
            code: self.code_string(),
            category: self.category(),
            message: self.message().to_string(),
            remediation: self
                .remediation()
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
        }
    }

    /// Returns the error message.
    #[must_use]
    pub const fn message(&self) -> &'static str {
        match self {
            Self::ConfigNotFound => "Configuration file not found",
            Self::ConfigReadError => "Failed to read configuration file",
            Self::ConfigParseError => "Configuration file contains invalid TOML syntax",
            Self::ConfigValidationError => "Configuration contains invalid values",
            Self::ConfigEnvError => "Environment variable has invalid value",

            Self::GitUnavailable => "Git executable could not be started",
            Self::GitCommandFailed => "Git query exited unsuccessfully",
            Self::GitOutputMalformed => "Git produced output sgit could not parse",
            Self::RepoRootNotFound => "Could not determine the repository root",
            Self::BranchUnresolved => "HEAD is not on a branch",

            Self::ChecklistNotFound => "No checklist exists for the current branch",
            Self::ChecklistReadError => "Checklist file could not be read",
            Self::ChecklistDirUnknown => "Checklist directory could not be determined",

            Self::BuildArtifactsMissing => "No build artifacts found under the repository root",
            Self::BuildScanFailed => "Scanning for build artifacts failed",

            Self::SkipValueInvalid => "Skip flag names an unknown validation",
            Self::SkipValueMissing => "Skip flag is missing its value",

            Self::ForwardFailed => "Could not start git to forward the command",
            Self::InternalIo => "Unexpected filesystem error",
        }
    }

    /// Returns remediation steps.
    #[must_use]
    pub const fn remediation(&self) -> &'static [&'static str] {
        match self {
            Self::ConfigNotFound => &[
                "Check the path passed with --config or SGIT_CONFIG",
                "Remove the override to fall back to ~/.config/sgit/config.toml",
            ],
            Self::ConfigReadError => &["Check file permissions on the configuration file"],
            Self::ConfigParseError => &[
                "Fix the TOML syntax reported above",
                "Delete the file to fall back to built-in defaults",
            ],
            Self::ConfigValidationError => &[
                "recent_build_window_secs must be greater than zero",
                "skip_flag and artifact_dir_name must not be empty",
                "done_marker must be exactly one character",
            ],
            Self::ConfigEnvError => &["Unset or correct the SGIT_* variable named above"],

            Self::GitUnavailable => &[
                "Install git or put it on PATH",
                "Set general.git_program or SGIT_GIT_PROGRAM to the git executable",
            ],
            Self::GitCommandFailed => &[
                "Run the reported git command manually to see the full error",
                "Check that the repository is not corrupted (git fsck)",
            ],
            Self::GitOutputMalformed => &["Check that general.git_program points at a real git"],
            Self::RepoRootNotFound => &[
                "Run sgit inside a git working tree",
                "Pass --repo <PATH> or set SGIT_REPO_ROOT",
            ],
            Self::BranchUnresolved => &[
                "Check out a branch (git switch <branch>) before pushing",
                "Or bypass with --skip-validation Checklist",
            ],

            Self::ChecklistNotFound => &[
                "Create the checklist file shown above, one item per line",
                "Mark finished items by ending the line with the done marker",
                "Or bypass with --skip-validation Checklist",
            ],
            Self::ChecklistReadError => &["Check file permissions on the checklist file"],
            Self::ChecklistDirUnknown => &[
                "Set checklist.directory in the config file",
                "Or set SGIT_CHECKLIST_DIR",
            ],

            Self::BuildArtifactsMissing => &[
                "Build the project so artifacts land in a bin directory",
                "Check validation.artifact_dir_name and validation.artifact_extensions",
                "Or bypass with --skip-validation RecentBuild",
            ],
            Self::BuildScanFailed => &["Check permissions on the directories reported above"],

            Self::SkipValueInvalid => &[
                "Use one or more of: Staging RecentBuild Checklist BuildAfterChecklist",
                "Names are case-sensitive; quote multiple names as one argument",
            ],
            Self::SkipValueMissing => &["Put the validation names right after the skip flag"],

            Self::ForwardFailed => &[
                "Check that git is installed and executable",
                "Set general.git_program or SGIT_GIT_PROGRAM",
            ],
            Self::InternalIo => &["Re-run with -v for more detail"],
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code_string())
    }
}

/// Complete error entry with all metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEntry {
    /// Error code string (e.g., "SGIT-E200")
    pub code: String,
    /// Error category
    pub category: ErrorCategory,
    /// Human-readable error message
    pub message: String,
    /// Steps to remediate the error
    pub remediation: Vec<String>,
}

impl ErrorEntry {
    /// Formats the error for display with full remediation steps.
    #[must_use]
    pub fn format_full(&self) -> String {
        let mut output = format!("[{}] {}\n", self.code, self.message);

        if !self.remediation.is_empty() {
            output.push_str("Remediation steps:\n");
            for (i, step) in self.remediation.iter().enumerate() {
                output.push_str(&format!("  {}. {}\n", i + 1, step));
            }
        }

        output
    }
}
