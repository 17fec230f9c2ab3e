//! Derived views over a table: chart data, analytics and exports
//!
//! Everything here is a pure function of an immutable [`dv_core::Table`];
//! nothing performs I/O.

pub mod export;
pub mod plots;
pub mod stats;

// Re-exports
pub use export::{export, sanitize_filename, table_to_records, ExportError, ExportFormat, ExportOptions};
pub use plots::{synthesize, synthesize_with_colors};
pub use stats::{
    analyze, column_mean, correlation, distribution, grouped_averages, key_factors, share_equal, validate_dataset,
    AnalyticsReport, DatasetRequirements, Insight,
};
