//! Core data model for the visualization pipeline
//!
//! Every component (parsers, inference, chart synthesis, the query
//! interpreter and analytics) consumes the same immutable [`Table`] and
//! produces new derived values from it.

pub mod chart;
pub mod format;
pub mod table;
pub mod value;

use thiserror::Error;

// Re-export commonly used types
pub use chart::{ChartData, ChartKind, NO_DATA_LABEL};
pub use table::{QueryResult, Record, SourceFormat, Table, TableMetadata};
pub use value::Value;

/// Errors raised by the core data model
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("Unknown {kind}: '{value}'")]
    UnknownVariant { kind: &'static str, value: String },
}
