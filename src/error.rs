//! Error types for the extraction pipeline
//!
//! Numeric conversion failures are not errors: the coercion engine maps them
//! to the `NaN` sentinel instead.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// Input could not be parsed at all (bad bytes, empty payload)
    #[error("HTML parsing failed: {reason}")]
    Parse { reason: String },

    /// Expected layout landmark is missing; the page shape changed
    #[error("Expected section '{landmark}' not found in document")]
    ExtractionStructure { landmark: String },

    /// Field map carried a value the materializer cannot serialize
    #[error("Unsupported value type {kind} in record {record}, field '{field}'")]
    UnsupportedValueType {
        record: usize,
        field: String,
        kind: &'static str,
    },

    #[error("Invalid CSS selector: {selector} - {reason}")]
    InvalidSelector { selector: String, reason: String },

    #[error("Invalid structural path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    #[error("Failed to parse request JSON: {0}")]
    Request(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn parse(reason: impl Into<String>) -> Self {
        Error::Parse {
            reason: reason.into(),
        }
    }

    pub fn structure(landmark: impl Into<String>) -> Self {
        Error::ExtractionStructure {
            landmark: landmark.into(),
        }
    }
}
