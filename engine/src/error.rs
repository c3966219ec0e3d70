//! Error types for the promo table engine.
//!
//! Normalization never fails, so errors only come from the layers around
//! it:
//!
//! - [`ImportError`] - Reading and decoding CSV files
//! - [`TableError`] - Invalid input to table operations
//! - [`StoreError`] - Persisting and restoring table snapshots
//! - [`CliError`] - Top-level errors of the `promo` binary
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.

use thiserror::Error;

// =============================================================================
// Import Errors
// =============================================================================

/// Errors while importing a CSV file.
#[derive(Debug, Error)]
pub enum ImportError {
    /// Failed to read file.
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),

    /// Unknown encoding label.
    #[error("Unsupported encoding: {0}")]
    Encoding(String),

    /// Nothing but blank lines.
    #[error("CSV file is empty")]
    EmptyFile,

    /// Header present, no data lines.
    #[error("CSV file contains no data rows, only a header")]
    NoData,
}

// =============================================================================
// Table Errors
// =============================================================================

/// Which bulk-edit input was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    From,
    To,
}

impl std::fmt::Display for Bound {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Bound::From => f.write_str("from"),
            Bound::To => f.write_str("to"),
        }
    }
}

/// Errors from table operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TableError {
    /// Bulk time is not `HH:MM` in 00:00-23:59.
    #[error("Invalid '{bound}' time '{value}': expected HH:MM (00:00 - 23:59)")]
    InvalidTime { bound: Bound, value: String },

    /// Bulk date is neither `DD.MM.YYYY` nor `YYYY-MM-DD`.
    #[error("Invalid '{bound}' date '{value}': expected DD.MM.YYYY or YYYY-MM-DD")]
    InvalidDate { bound: Bound, value: String },

    /// Row index past the end of the table.
    #[error("Row {index} out of range (table has {len} rows)")]
    RowOutOfRange { index: usize, len: usize },

    /// Column index past the last column.
    #[error("Column {0} out of range (table has 6 columns)")]
    ColumnOutOfRange(usize),
}

// =============================================================================
// Store Errors
// =============================================================================

/// Errors while saving or loading table snapshots.
#[derive(Debug, Error)]
pub enum StoreError {
    /// IO error.
    #[error("Store IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error.
    #[error("Store JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Snapshot does not match the expected shape.
    #[error("Invalid snapshot: {errors:?}")]
    InvalidSnapshot { errors: Vec<String> },
}

// =============================================================================
// CLI Errors (top-level)
// =============================================================================

/// Errors surfaced by the `promo` binary.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Import error: {0}")]
    Import(#[from] ImportError),

    #[error("Table error: {0}")]
    Table(#[from] TableError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Usage(String),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for import operations.
pub type ImportResult<T> = Result<T, ImportError>;

/// Result type for table operations.
pub type TableResult<T> = Result<T, TableError>;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Result type for CLI commands.
pub type CliResult<T> = Result<T, CliError>;
