//! Error types for CSV to Vowpal Wabbit conversion.

use std::path::PathBuf;
use thiserror::Error;

use crate::config::ColumnRole;

/// Errors that abort a conversion.
#[derive(Debug, Error)]
pub enum ConvertError {
    // === File System Errors ===
    /// Input file not found.
    #[error("input file not found: {path}")]
    InputNotFound { path: PathBuf },

    /// Failed to open the input file.
    #[error("failed to open input {path}: {source}")]
    InputOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to create the output file.
    #[error("failed to create output {path}: {source}")]
    OutputCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === Column Resolution Errors ===
    /// Specifier is neither a position nor a known column name.
    #[error("could not resolve column '{specifier}': {}", unresolved_reason(.header_available))]
    UnresolvedColumn {
        specifier: String,
        header_available: bool,
    },

    /// Negative position other than the `-1` sentinel.
    #[error("invalid column position {value} in '{specifier}'")]
    InvalidPosition { specifier: String, value: i64 },

    /// Header row was expected but the input has no rows at all.
    #[error("input is empty, expected a header row")]
    MissingHeader,

    /// Header names requested as feature keys but the header has no columns.
    #[error("header row is empty, cannot use header names as feature keys")]
    EmptyHeader,

    /// Delimiter is not a single ASCII character.
    #[error("invalid delimiter '{0}', expected a single ASCII character")]
    InvalidDelimiter(String),

    // === Streaming Errors ===
    /// The CSV parser failed on a record.
    #[error("failed to parse CSV at row {row}: {source}")]
    CsvParse {
        row: u64,
        #[source]
        source: csv::Error,
    },

    /// Writing a line to the output failed.
    #[error("failed to write output: {0}")]
    Write(#[source] std::io::Error),

    /// A row could not be transformed and the short-row policy is `abort`.
    #[error("row {row}: {source}")]
    Row {
        row: u64,
        #[source]
        source: RowError,
    },

    /// The OS refused to start a pipeline thread.
    #[error("failed to spawn {stage} thread: {source}")]
    ThreadSpawn {
        stage: &'static str,
        #[source]
        source: std::io::Error,
    },

    /// A pipeline thread panicked.
    #[error("{stage} thread panicked")]
    ThreadPanicked { stage: &'static str },
}

fn unresolved_reason(header_available: &bool) -> &'static str {
    if *header_available {
        "not a column index and no matching column name in header"
    } else {
        "not a column index and no header row was read"
    }
}

/// Per-row transformation failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowError {
    /// A special-role column lies beyond the end of the row.
    #[error("{role} column {index} is out of range for a row with {width} cells")]
    ColumnOutOfRange {
        role: ColumnRole,
        index: usize,
        width: usize,
    },

    /// `LastCell` label on a row without cells.
    #[error("row has no cells to take the label from")]
    EmptyRow,

    /// Feature column has no header name to use as its key.
    #[error("column {index} has no header name (header has {header_width} columns)")]
    UnnamedColumn { index: usize, header_width: usize },
}

/// Result type for conversion operations.
pub type Result<T> = std::result::Result<T, ConvertError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unresolved_column_mentions_header() {
        let err = ConvertError::UnresolvedColumn {
            specifier: "price".to_string(),
            header_available: false,
        };
        assert_eq!(
            err.to_string(),
            "could not resolve column 'price': not a column index and no header row was read"
        );

        let err = ConvertError::UnresolvedColumn {
            specifier: "price".to_string(),
            header_available: true,
        };
        assert!(err.to_string().contains("no matching column name in header"));
    }

    #[test]
    fn test_row_error_display() {
        let err = RowError::ColumnOutOfRange {
            role: ColumnRole::Tag,
            index: 4,
            width: 2,
        };
        assert_eq!(
            err.to_string(),
            "tag column 4 is out of range for a row with 2 cells"
        );
    }

    #[test]
    fn test_thread_spawn_display() {
        let err = ConvertError::ThreadSpawn {
            stage: "worker",
            source: std::io::Error::other("resource temporarily unavailable"),
        };
        assert_eq!(
            err.to_string(),
            "failed to spawn worker thread: resource temporarily unavailable"
        );
    }
}
