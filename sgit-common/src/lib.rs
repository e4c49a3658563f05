//! Shared types and utilities for sgit.
//!
//! The validation engine lives in the `sgit` crate; this crate holds the
//! vocabulary it shares with the CLI (validation and operation kinds, the
//! configuration model), the error catalog, and logging setup.

pub mod config;
pub mod errors;
pub mod logging;
pub mod types;
pub mod util;

pub use config::{ConfigError, LoadedConfig, load_config};
pub use errors::{ErrorCategory, ErrorCode, ErrorEntry};
pub use logging::{LogConfig, LoggingGuards, init_logging};
pub use types::{
    ChecklistConfig, GeneralConfig, OperationKind, SgitConfig, UnknownValidationKind,
    ValidationConfig, ValidationKind,
};
