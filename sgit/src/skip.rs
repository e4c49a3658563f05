//! Extracting `--skip-validation "<Kind> [<Kind>...]"` from git arguments.
//!
//! The flag and its value are removed so git never sees them. The flag may
//! appear more than once; the skip set is the union of all occurrences.

use sgit_common::{ErrorCode, UnknownValidationKind, ValidationKind};
use std::collections::BTreeSet;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkipArgError {
    #[error("{flag} must be followed by a list of validation kinds")]
    MissingValue { flag: String },

    #[error("{flag} was given an empty list of validation kinds")]
    EmptyValue { flag: String },

    #[error("invalid value for {flag}: {source}")]
    UnknownKind {
        flag: String,
        #[source]
        source: UnknownValidationKind,
    },
}

impl SkipArgError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::MissingValue { .. } => ErrorCode::SkipValueMissing,
            Self::EmptyValue { .. } | Self::UnknownKind { .. } => ErrorCode::SkipValueInvalid,
        }
    }
}

/// Skip set plus the arguments left to forward.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkipExtraction {
    pub skipped: BTreeSet<ValidationKind>,
    pub args: Vec<String>,
}

/// Remove every `flag <value>` pair from `args` and parse the values.
pub fn extract_skips(args: &[String], flag: &str) -> Result<SkipExtraction, SkipArgError> {
    let mut extraction = SkipExtraction::default();
    let mut tokens = args.iter();

    while let Some(token) = tokens.next() {
        if token != flag {
            extraction.args.push(token.clone());
            continue;
        }
        let value = tokens.next().ok_or_else(|| SkipArgError::MissingValue {
            flag: flag.to_string(),
        })?;
        let kinds = parse_kinds(value, flag)?;
        extraction.skipped.extend(kinds);
    }

    Ok(extraction)
}

fn parse_kinds(value: &str, flag: &str) -> Result<Vec<ValidationKind>, SkipArgError> {
    let kinds = value
        .split_whitespace()
        .map(|name| {
            name.parse::<ValidationKind>()
                .map_err(|source| SkipArgError::UnknownKind {
                    flag: flag.to_string(),
                    source,
                })
        })
        .collect::<Result<Vec<_>, _>>()?;
    if kinds.is_empty() {
        return Err(SkipArgError::EmptyValue {
            flag: flag.to_string(),
        });
    }
    Ok(kinds)
}
