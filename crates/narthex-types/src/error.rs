use thiserror::Error;

/// Errors produced while extracting a key identifier from a request path.
///
/// Every variant is a client error and maps to `400 Bad Request`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("path has no identifier segment: {0:?}")]
    MissingSegment(String),

    #[error("identifier is missing the 0x prefix: {0:?}")]
    MissingPrefix(String),

    #[error("identifier must have {min}..={max} hex digits, got {actual}")]
    InvalidDigitCount { min: usize, max: usize, actual: usize },

    #[error("invalid hex string: {0:?}")]
    InvalidHex(String),
}
