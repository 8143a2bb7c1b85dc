use std::path::PathBuf;
use thiserror::Error;

/// Failures of the tabular boundary. Row numbers are 1-based data rows
/// (the header is not counted).
#[derive(Error, Debug)]
pub enum TableError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("CSV input has no header row")]
    MissingHeader,
    #[error("Unterminated quoted field starting on line {line}")]
    UnterminatedQuote { line: usize },
    #[error("Row {row} has {got} fields but the header has {expected}")]
    RaggedRow { row: usize, expected: usize, got: usize },
    #[error("Column `{0}` not found")]
    MissingColumn(String),
    #[error("Column `{column}` row {row}: cannot parse `{value}` as a number")]
    ParseValue { column: String, row: usize, value: String },
    #[error("Column `{column}` has {got} values but the table has {expected} rows")]
    LengthMismatch { column: String, expected: usize, got: usize },
}
