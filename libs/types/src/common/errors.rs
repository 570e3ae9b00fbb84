//! Error types for identifier validation

use thiserror::Error;

/// Errors that can occur while parsing or validating an address-typed identifier
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// Hex digit count does not match the address width
    #[error("Invalid address length: expected {expected} hex digits, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    /// Input contains characters that are not hex digits
    #[error("Invalid hex address '{input}': {reason}")]
    InvalidHex { input: String, reason: String },
}
