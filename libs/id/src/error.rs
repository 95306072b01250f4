//! Parse errors for typed identifiers.

use thiserror::Error;

/// Errors produced when parsing an identifier string.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IdError {
    /// The input string is empty.
    #[error("identifier cannot be empty")]
    Empty,

    /// The input has no `{prefix}_` part.
    #[error("identifier missing '{expected}_' prefix: got '{found}'")]
    MissingPrefix { expected: &'static str, found: String },

    /// The input carries a prefix for a different resource type.
    #[error("wrong identifier prefix: expected '{expected}', got '{found}'")]
    WrongPrefix { expected: &'static str, found: String },

    /// The payload after the prefix is not a valid ULID.
    #[error("invalid ULID payload: {0}")]
    BadUlid(String),
}

impl IdError {
    /// True when the error is a prefix mismatch rather than a bad payload.
    pub fn is_prefix_mismatch(&self) -> bool {
        matches!(
            self,
            IdError::MissingPrefix { .. } | IdError::WrongPrefix { .. }
        )
    }
}
