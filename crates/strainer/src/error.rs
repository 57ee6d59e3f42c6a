//! Error types for the strainer crate.
//!
//! Every failure is request-scoped: resolution stops at the first error and
//! no partial result is produced.

use thiserror::Error;

use crate::op::{FilterType, Op};

/// Errors that can occur while resolving a filter, sort or pagination request.
#[derive(Debug, Error)]
pub enum StrainerError {
    /// A path segment has no matching accessor on the current object.
    #[error("unable to resolve field '{path}': no accessor for segment '{segment}'")]
    UnresolvableField { path: String, segment: String },

    /// The path walks through, or ends on, a value of a disallowed shape.
    #[error("field '{path}' has unsupported type: {found}")]
    UnsupportedFieldType { path: String, found: &'static str },

    /// The raw filter value cannot be coerced to the declared type.
    #[error("invalid filter value '{value}' for {expected}: {reason}")]
    InvalidFilterValue {
        value: String,
        expected: FilterType,
        reason: String,
    },

    /// A list operator was given a value without `[` `]` delimiters.
    #[error("value must be a list of the form [item1,item2,...], got '{value}'")]
    MalformedListValue { value: String },

    /// The operator has no semantics for the declared type.
    #[error("operator '{op}' is not supported for {kind} values")]
    UnsupportedOperatorForType { op: Op, kind: FilterType },

    /// A query executor failed while serving a delegated request.
    #[error("query executor failed: {0}")]
    Executor(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The configuration document could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_yaml::Error),

    /// The configuration file could not be read.
    #[error("unable to read configuration: {0}")]
    Io(#[from] std::io::Error),
}

impl StrainerError {
    pub(crate) fn unresolvable(path: &str, segment: &str) -> Self {
        StrainerError::UnresolvableField {
            path: path.to_string(),
            segment: segment.to_string(),
        }
    }

    pub(crate) fn unsupported_type(path: &str, found: &'static str) -> Self {
        StrainerError::UnsupportedFieldType {
            path: path.to_string(),
            found,
        }
    }

    pub(crate) fn invalid_value(
        value: &str,
        expected: FilterType,
        reason: impl std::fmt::Display,
    ) -> Self {
        StrainerError::InvalidFilterValue {
            value: value.to_string(),
            expected,
            reason: reason.to_string(),
        }
    }

    /// Wraps an executor failure.
    ///
    /// An executor that itself reports a `StrainerError` (for example an
    /// invalid filter) has that error passed through unchanged.
    pub fn executor(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        match err.into().downcast::<StrainerError>() {
            Ok(err) => *err,
            Err(other) => StrainerError::Executor(other),
        }
    }

    /// Returns `true` for failures caused by the client's request rather
    /// than by the executor or configuration.
    pub fn is_input_error(&self) -> bool {
        !matches!(
            self,
            StrainerError::Executor(_) | StrainerError::Config(_) | StrainerError::Io(_)
        )
    }
}

/// Result type for strainer operations.
pub type Result<T> = std::result::Result<T, StrainerError>;
