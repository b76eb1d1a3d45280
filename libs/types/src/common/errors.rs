//! Error types for identifier and amount validation

use thiserror::Error;

/// Errors raised while parsing or validating identifiers and amounts
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Address string is not 20 bytes of hex
    #[error("Invalid address '{input}': {reason}")]
    InvalidAddress { input: String, reason: String },

    /// Amount string is not a base-10 unsigned integer that fits in 256 bits
    #[error("Invalid amount '{input}': expected unsigned base-10 integer")]
    InvalidAmount { input: String },
}
