//! Error types for the Hashive format

use crate::marker::ValueKind;
use thiserror::Error;

/// Hashive error kinds
#[derive(Debug, Error)]
pub enum HashiveError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid file signature")]
    InvalidSignature,
    #[error("type mismatch: expected {expected}, got {got}")]
    Type {
        /// The type the codec was reading
        expected: ValueKind,
        /// The type marker actually observed
        got: ValueKind,
    },
    #[error("not found")]
    NotFound,
    #[error("array index out of range: {index} of {len}")]
    OutOfBounds {
        /// Array length
        len: usize,
        /// Requested index
        index: usize,
    },
    #[error("malformed data: {0}")]
    Format(String),
    #[error("internal error: {0}")]
    Internal(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, HashiveError>;
