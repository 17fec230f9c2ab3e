//! Excel workbook parsing

use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Range, Reader};
use dv_core::{SourceFormat, Table, Value};
use tracing::{debug, info};

use crate::DataError;

/// Excel parser. Only the first worksheet is read; its first row is the header.
#[derive(Debug, Clone, Default)]
pub struct ExcelSource;

impl ExcelSource {
    pub fn new() -> Self {
        Self
    }

    /// Decode workbook bytes (xlsx, xls, xlsb or ods) into a table
    pub fn parse(&self, content: &[u8], file_name: &str) -> Result<Table, DataError> {
        if content.iter().all(u8::is_ascii_whitespace) {
            return Err(DataError::EmptyFile);
        }

        let mut workbook =
            open_workbook_auto_from_rs(Cursor::new(content)).map_err(|e| DataError::processing("Excel", e))?;

        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| DataError::processing("Excel", "workbook has no worksheets"))?
            .map_err(|e| DataError::processing("Excel", e))?;

        let table = sheet_to_table(&range, file_name)?
            .with_file_size(content.len() as u64)
            .with_format(SourceFormat::Excel);

        info!(
            "Parsed Excel {}: {} rows, {} columns",
            file_name,
            table.row_count(),
            table.column_count()
        );

        Ok(table)
    }
}

/// Convert a worksheet range into a table, row-major, first row as headers
pub(crate) fn sheet_to_table(range: &Range<Data>, file_name: &str) -> Result<Table, DataError> {
    let mut rows = range.rows();

    let headers: Vec<String> = match rows.next() {
        Some(header_row) => header_row.iter().map(header_name).collect(),
        None => return Err(DataError::EmptyFile),
    };
    if headers.iter().all(|h| h.is_empty()) {
        return Err(DataError::NoHeaders);
    }

    let mut data = Vec::new();
    let mut skipped = 0usize;

    for row in rows {
        if row.len() > headers.len() {
            skipped += 1;
            continue;
        }
        let mut cells: Vec<Value> = row.iter().map(cell_value).collect();
        if cells.iter().all(Value::is_blank) {
            skipped += 1;
            continue;
        }
        cells.resize(headers.len(), Value::Null);
        data.push(cells);
    }

    if skipped > 0 {
        debug!("{}: skipped {} empty or oversized sheet rows", file_name, skipped);
    }

    Ok(Table::new(headers, data, file_name))
}

fn header_name(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        other => other.to_string().trim().to_string(),
    }
}

/// Map a sheet cell to a table value without losing its native type
pub(crate) fn cell_value(cell: &Data) -> Value {
    match cell {
        Data::Empty => Value::Null,
        Data::String(s) => Value::String(s.clone()),
        Data::Float(f) => Value::Number(*f),
        Data::Int(i) => Value::Number(*i as f64),
        Data::Bool(b) => Value::Bool(*b),
        other => Value::String(other.to_string()),
    }
}
