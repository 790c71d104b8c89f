//! Error types for parsing and for typed access to the value tree.

use thiserror::Error;

use crate::types::Kind;

/// Errors that can occur while parsing JSON or operating on a [`Value`](crate::Value).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum JsonError {
    /// The input was not valid JSON.
    /// `offset` is the byte position where the problem was detected.
    #[error("JSON syntax error at offset {offset}: {message}")]
    Syntax { offset: usize, message: String },

    /// Arrays and dicts were nested deeper than the configured limit.
    #[error("nesting depth limit of {limit} exceeded at offset {offset}")]
    DepthLimit { limit: usize, offset: usize },

    /// A typed accessor or mutator was applied to a value of another kind.
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: Kind, found: Kind },

    /// A numeric kind tag outside `0..=6`.
    #[error("unknown value kind tag: {0}")]
    UnknownKind(u8),

    /// A string payload was requested as UTF-8 but holds other bytes.
    #[error("string payload is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),
}

impl JsonError {
    pub(crate) fn syntax(offset: usize, message: impl Into<String>) -> Self {
        JsonError::Syntax {
            offset,
            message: message.into(),
        }
    }
}

/// Convenience alias used throughout jsonz-core.
pub type Result<T> = std::result::Result<T, JsonError>;
