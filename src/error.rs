//! Error types for the payroll consolidator.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every fatal condition of a consolidation run. Non-fatal conditions
//! (an unresolved salary column, rows without a master match) are not errors;
//! they are reported as [`RunWarning`](crate::models::RunWarning)s.

use thiserror::Error;

/// The main error type for the payroll consolidator.
///
/// Every variant maps to a distinct, user-facing diagnostic so the caller
/// can tell a schema mismatch from an unreadable file or an empty report.
///
/// # Example
///
/// ```
/// use payroll_consolidator::error::ConsolidationError;
///
/// let error = ConsolidationError::MissingJoinKey {
///     column: "Nº pers.".to_string(),
///     available: vec!["Nombre".to_string(), "Cedula".to_string()],
/// };
/// assert_eq!(
///     error.to_string(),
///     "Join key column 'Nº pers.' not found in master data; available columns: Nombre, Cedula"
/// );
/// ```
#[derive(Debug, Error)]
pub enum ConsolidationError {
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

    /// Configuration parsed but holds an unusable value.
    #[error("Invalid configuration value '{field}': {message}")]
    InvalidConfig {
        /// The offending configuration field.
        field: String,
        /// What is wrong with it.
        message: String,
    },

    /// The liquidation report could not be read.
    #[error("Failed to read report '{path}': {message}")]
    ReportRead {
        /// The report path.
        path: String,
        /// The underlying I/O error.
        message: String,
    },

    /// The report yielded neither concept lines nor net-total lines.
    #[error(
        "No concept or net-total lines could be extracted from the report; \
         it does not match the expected liquidation layout"
    )]
    EmptyExtraction,

    /// The master data file could not be opened or decoded.
    #[error("Failed to read master data '{path}': {message}")]
    MasterDataRead {
        /// The master data path.
        path: String,
        /// The underlying reader error.
        message: String,
    },

    /// The master data file has an extension no reader understands.
    #[error("Unsupported master data format '{extension}' for '{path}' (expected csv, xlsx, xlsm, xlsb, xls or ods)")]
    UnsupportedMasterFormat {
        /// The master data path.
        path: String,
        /// The extension that was found.
        extension: String,
    },

    /// The master workbook contains no worksheet.
    #[error("Master data workbook '{path}' contains no worksheet")]
    MasterSheetMissing {
        /// The master data path.
        path: String,
    },

    /// The declared join key column is absent from the master data.
    #[error(
        "Join key column '{column}' not found in master data; available columns: {}",
        .available.join(", ")
    )]
    MissingJoinKey {
        /// The join key column that was expected.
        column: String,
        /// The (trimmed) columns the master data actually has.
        available: Vec<String>,
    },

    /// The consolidated result could not be written.
    #[error("Failed to write output '{path}': {message}")]
    OutputWrite {
        /// The output path.
        path: String,
        /// The underlying writer error.
        message: String,
    },
}

/// A type alias for Results that return ConsolidationError.
pub type ConsolidationResult<T> = Result<T, ConsolidationError>;
