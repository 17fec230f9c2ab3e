//! Tabular parsers for uploaded files

pub mod csv_source;
pub mod excel_source;
pub mod provider;
pub mod sql_source;

use dv_core::{SourceFormat, Table};

use crate::config::ImportConfig;
use crate::DataError;

pub use csv_source::CsvSource;
pub use excel_source::ExcelSource;
pub use provider::{import, ContentProvider, FileContent, FsContentProvider};
pub use sql_source::SqlScriptSource;

/// Parse already-read file content in the given format
pub fn parse(content: &[u8], format: SourceFormat, file_name: &str) -> Result<Table, DataError> {
    parse_with_config(content, format, file_name, &ImportConfig::default())
}

/// Parse with import overrides applied
pub fn parse_with_config(
    content: &[u8],
    format: SourceFormat,
    file_name: &str,
    config: &ImportConfig,
) -> Result<Table, DataError> {
    match format {
        SourceFormat::Csv => {
            let mut source = CsvSource::new();
            if let Some(delimiter) = config.delimiter_byte() {
                source = source.with_delimiter(delimiter);
            }
            source.parse(content, file_name)
        }
        SourceFormat::Excel => ExcelSource::new().parse(content, file_name),
        SourceFormat::Sql => SqlScriptSource::new().parse(content, file_name),
    }
}
