//! Error catalog and definitions for sgit
//!
//! Each error that can block a gated operation outside of an ordinary
//! validation failure carries a unique code and remediation steps.
//!
//! # Error Code Ranges
//!
//! | Range      | Category    | Description                          |
//! |------------|-------------|--------------------------------------|
//! | E001-E099  | Config      | Configuration and setup errors       |
//! | E100-E199  | Repository  | Git invocation and repository state  |
//! | E200-E299  | Checklist   | Branch checklist store               |
//! | E300-E399  | Build       | Build artifact discovery             |
//! | E400-E499  | Input       | Malformed command-line input         |
//! | E500-E599  | Internal    | Forwarding and unexpected errors     |

pub mod catalog;

pub use catalog::{ErrorCategory, ErrorCode, ErrorEntry};
