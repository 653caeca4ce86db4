//! Codec errors

use thiserror::Error;

/// Errors raised while building, encoding or decoding a message.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CodecError {
    /// Internal messages have no wire codec
    #[error("message '{0}' is internal and cannot be serialized")]
    NotSerializable(String),

    #[error("input truncated: needed {needed} bytes, {remaining} remaining")]
    Truncated { needed: usize, remaining: usize },

    #[error("field '{field}' holds {length} bytes but its buffer capacity is {capacity}")]
    PayloadOverflow {
        field: String,
        length: usize,
        capacity: usize,
    },

    #[error("unknown message type id {0}")]
    UnknownType(u32),

    #[error("type id mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: u32, found: u32 },

    #[error("message '{message}' has no field '{field}'")]
    UnknownField { message: String, field: String },

    #[error("field '{field}' expects a {expected} value")]
    ValueKind {
        field: String,
        expected: &'static str,
    },

    #[error("field '{0}' is fixed at creation")]
    ReadOnly(String),

    #[error("message '{message}' takes {expected} arguments, got {found}")]
    ArgumentCount {
        message: String,
        expected: usize,
        found: usize,
    },
}

impl CodecError {
    /// Returns a stable numeric code for this error
    pub fn error_code(&self) -> u32 {
        match self {
            CodecError::NotSerializable(_) => 1,
            CodecError::Truncated { .. } => 2,
            CodecError::PayloadOverflow { .. } => 3,
            CodecError::UnknownType(_) => 4,
            CodecError::TypeMismatch { .. } => 5,
            CodecError::UnknownField { .. } => 6,
            CodecError::ValueKind { .. } => 7,
            CodecError::ReadOnly(_) => 8,
            CodecError::ArgumentCount { .. } => 9,
        }
    }
}

/// Result type alias for codec operations
pub type CodecResult<T> = Result<T, CodecError>;
