//! # Error Types
//!
//! Errors shared by every crate that reads or writes multi-format strings.

use thiserror::Error;

/// Errors raised while decoding a multi-format string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MultiFormatError {
    /// The string is shorter than a prefix.
    #[error("multi-format string too short: {0:?}")]
    TooShort(String),

    /// The two-character prefix does not belong to a known format.
    #[error("unknown multi-format prefix: {0}")]
    UnknownPrefix(String),

    /// The prefix is known but not the one this decoder expects.
    #[error("unexpected multi-format prefix: expected {expected}, got {actual}")]
    UnexpectedPrefix {
        expected: &'static str,
        actual: String,
    },

    /// The payload after the prefix is malformed for its format.
    #[error("malformed {format} payload: {reason}")]
    MalformedPayload {
        format: &'static str,
        reason: String,
    },
}
