//! Data ingestion, inference and querying for the visualization pipeline

pub mod config;
pub mod query;
pub mod schema;
pub mod sources;

use arrow::error::ArrowError;
use thiserror::Error;

// Re-exports
pub use config::{ImportConfig, MissingValues};
pub use query::{execute, parse_query, SelectQuery};
pub use schema::{compute_stats, infer_quality, ColumnKind, ColumnProfiler, ColumnStat, QualityReport};
pub use sources::{parse, CsvSource, ExcelSource, SqlScriptSource};

/// Errors that can occur in data operations
#[derive(Error, Debug)]
pub enum DataError {
    #[error("File is empty or could not be read")]
    EmptyFile,

    #[error("File has no headers")]
    NoHeaders,

    #[error("Only SELECT queries are supported")]
    UnsupportedQuery,

    #[error("Column '{column}' not found. Available columns: {}", .available.join(", "))]
    UnknownColumn { column: String, available: Vec<String> },

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Failed to process {format} file: {message}")]
    Processing { format: &'static str, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Arrow error: {0}")]
    Arrow(#[from] ArrowError),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl DataError {
    pub(crate) fn processing(format: &'static str, message: impl ToString) -> Self {
        DataError::Processing {
            format,
            message: message.to_string(),
        }
    }
}

impl From<csv::Error> for DataError {
    fn from(error: csv::Error) -> Self {
        match error.kind() {
            csv::ErrorKind::Io(io_err) => DataError::Io(std::io::Error::new(io_err.kind(), error.to_string())),
            _ => DataError::processing("CSV", error),
        }
    }
}
