//! Configuration system for sgit.
//!
//! This module provides configuration management including:
//! - TOML config file discovery (`--config`, `SGIT_CONFIG`, `~/.config/sgit/config.toml`)
//! - `SGIT_*` environment variable overrides with type safety
//! - Source tracking for debugging
//! - Validation on startup

pub mod env;
pub mod load;
pub mod source;

pub use env::{EnvError, EnvParser};
pub use load::{
    CONFIG_PATH_ENV, ConfigError, LoadedConfig, apply_env_overrides, default_config_path,
    load_config, read_config_file, validate_config,
};
pub use source::{ConfigSource, Sourced};
