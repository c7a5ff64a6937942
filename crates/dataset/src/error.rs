//! Error types for the dataset crate.

use thiserror::Error;

/// Errors that can occur while reading and cleaning the movie table
///
/// Each variant carries enough context to point at the offending file,
/// record, or value without re-reading the input.
#[derive(Error, Debug)]
pub enum DatasetError {
    /// File could not be found or opened
    #[error("Failed to open file: {path}")]
    FileNotFound { path: String },

    /// I/O error occurred while reading file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// A CSV record couldn't be read or deserialized
    ///
    /// `record` is 1-based and counts data records, not lines, since a
    /// quoted CSV field may span several lines.
    #[error("CSV error at record {record} in {file}: {reason}")]
    CsvError {
        file: String,
        record: usize,
        reason: String,
    },

    /// A data field had an invalid value
    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    /// Data validation failed
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, DatasetError>;
