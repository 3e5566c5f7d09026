//! # Validation Errors
//!
//! Errors raised when constructing core primitives from untrusted input.
//! Each variant carries the rejected input and the expected format so an
//! operator can fix the value without reading source.

use thiserror::Error;

/// Validation errors for core primitive newtypes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Account identifier is not a 20-byte hex address.
    #[error("invalid account id: \"{0}\" (expected 0x-prefixed 40-character hex address)")]
    InvalidAccountId(String),

    /// Token amount string could not be converted to base units.
    #[error("invalid amount: \"{value}\" ({reason})")]
    InvalidAmount {
        /// The string that failed to parse.
        value: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Unix timestamp is outside the representable range.
    #[error("invalid timestamp: \"{value}\" ({reason})")]
    InvalidTimestamp {
        /// The rejected value.
        value: String,
        /// Why it was rejected.
        reason: String,
    },
}
