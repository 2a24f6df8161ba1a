//! Error types for occucode.
//!
//! All fallible operations in the crate return [`Result`], whose error side is
//! the [`OccucodeError`] enum.
//!
//! # Examples
//!
//! ```
//! use occucode::error::{OccucodeError, Result};
//!
//! fn example_operation() -> Result<()> {
//!     Err(OccucodeError::invalid_input("batch_size must be positive"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use thiserror::Error;

/// The main error type for occucode operations.
///
/// Empty input and unknown code names are not errors: they surface as empty
/// match lists and `None` names respectively.
#[derive(Error, Debug)]
pub enum OccucodeError {
    /// I/O errors (reading reference tables, config files, input files)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// CSV decoding/encoding errors
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Normalizer construction errors (bad patterns, unreadable lexicons)
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// The caller passed an input of the wrong shape or an invalid option
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Taxonomy or alias data for the requested version is absent
    #[error("Missing reference data: {0}")]
    MissingReferenceData(String),

    /// Embedding provider failures
    #[error("Embedding error: {0}")]
    Embedding(String),

    /// Configuration errors
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Invalid operation
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
}

/// Result type alias for operations that may fail with OccucodeError.
pub type Result<T> = std::result::Result<T, OccucodeError>;

impl OccucodeError {
    /// Create a new analysis error.
    pub fn analysis<S: Into<String>>(msg: S) -> Self {
        OccucodeError::Analysis(msg.into())
    }

    /// Create a new invalid input error.
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        OccucodeError::InvalidInput(msg.into())
    }

    /// Create a new missing reference data error.
    pub fn missing_reference_data<S: Into<String>>(msg: S) -> Self {
        OccucodeError::MissingReferenceData(msg.into())
    }

    /// Create a new embedding error.
    pub fn embedding<S: Into<String>>(msg: S) -> Self {
        OccucodeError::Embedding(msg.into())
    }

    /// Create a new invalid config error.
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        OccucodeError::InvalidConfig(msg.into())
    }

    /// Create a new invalid operation error.
    pub fn invalid_operation<S: Into<String>>(msg: S) -> Self {
        OccucodeError::InvalidOperation(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_construction() {
        let error = OccucodeError::invalid_input("not a sequence");
        assert_eq!(error.to_string(), "Invalid input: not a sequence");

        let error = OccucodeError::missing_reference_data("csco99");
        assert_eq!(error.to_string(), "Missing reference data: csco99");

        let error = OccucodeError::analysis("bad pattern");
        assert_eq!(error.to_string(), "Analysis error: bad pattern");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let error = OccucodeError::from(io_error);

        match error {
            OccucodeError::Io(_) => {}
            _ => panic!("Expected IO error variant"),
        }
    }
}
