use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
/// Errors returned by the CSV loaders.
pub enum DictionaryError {
    /// Reading the file failed.
    #[error("failed to read {path}: {source}")]
    Io {
        /// File that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The file is empty or has no header row.
    #[error("CSV input must have a header row with column names")]
    MissingHeader,

    /// One or more required columns are absent from the header.
    #[error("CSV input is missing required columns: {columns}")]
    MissingColumns {
        /// Comma-separated list of missing column names.
        columns: String,
    },

    /// A quoted field was never closed.
    #[error("unterminated quoted field starting on line {line}")]
    UnterminatedQuote {
        /// 1-based line where the quote opened.
        line: usize,
    },

    /// Every row was skipped or the file had no data rows.
    #[error("no valid rows were loaded from the CSV input")]
    NoValidRows,
}

/// Convenience result type for loader operations.
pub type DictionaryResult<T> = Result<T, DictionaryError>;
