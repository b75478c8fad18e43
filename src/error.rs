//! Error types for the payroll engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while turning attendance into payroll.

use thiserror::Error;

/// The main error type for the payroll engine.
///
/// All fallible operations in the engine return this error type. Lenient
/// ingestion rules (unparsable dates or times, malformed tax brackets) are
/// not errors and never surface here.
///
/// # Example
///
/// ```
/// use payroll_engine::error::PayrollError;
///
/// let error = PayrollError::MissingColumn {
///     column: "clock_in".to_string(),
/// };
/// assert_eq!(error.to_string(), "Missing required column: clock_in");
/// ```
#[derive(Debug, Error)]
pub enum PayrollError {
    /// A required attendance column was not present in the input table.
    #[error("Missing required column: {column}")]
    MissingColumn {
        /// The canonical name of the missing column.
        column: String,
    },

    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A record in a tabular input could not be interpreted.
    #[error("Invalid record at line {line}: {message}")]
    InvalidRecord {
        /// The 1-based line of the offending record.
        line: usize,
        /// A description of what was wrong.
        message: String,
    },

    /// Reading or writing CSV data failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A general calculation error occurred.
    #[error("Calculation error: {message}")]
    CalculationError {
        /// A description of the calculation error.
        message: String,
    },
}

/// A type alias for Results that return PayrollError.
pub type EngineResult<T> = Result<T, PayrollError>;
