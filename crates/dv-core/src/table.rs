//! The normalized table every component consumes

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::value::Value;
use crate::CoreError;

/// Mapping-form row: header name to cell, in header order
pub type Record = IndexMap<String, Value>;

/// Source file format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    Csv,
    Excel,
    Sql,
}

impl SourceFormat {
    /// Detect the format from a bare extension (without the dot)
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "csv" | "tsv" | "txt" => Some(SourceFormat::Csv),
            "xlsx" | "xls" | "xlsm" | "xlsb" | "ods" => Some(SourceFormat::Excel),
            "sql" => Some(SourceFormat::Sql),
            _ => None,
        }
    }

    /// Detect the format from a file name or path
    pub fn from_file_name(name: &str) -> Option<Self> {
        Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceFormat::Csv => "csv",
            SourceFormat::Excel => "excel",
            SourceFormat::Sql => "sql",
        }
    }
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceFormat {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(SourceFormat::Csv),
            "excel" | "xlsx" | "xls" => Ok(SourceFormat::Excel),
            "sql" => Ok(SourceFormat::Sql),
            other => Err(CoreError::UnknownVariant {
                kind: "source format",
                value: other.to_string(),
            }),
        }
    }
}

/// Table metadata. Counts are derived from the table and cannot be set.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableMetadata {
    row_count: usize,
    column_count: usize,
    file_size: u64,
    file_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<SourceFormat>,
}

impl TableMetadata {
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn column_count(&self) -> usize {
        self.column_count
    }

    /// Size of the source content in bytes
    pub fn file_size(&self) -> u64 {
        self.file_size
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn format(&self) -> Option<SourceFormat> {
        self.format
    }
}

/// Immutable table of positional rows aligned to `headers`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<Value>>,
    metadata: TableMetadata,
}

impl Table {
    /// Build a table from positional rows.
    ///
    /// Rows whose length differs from the header count are dropped. Repeated
    /// header names get a numeric suffix so mapping-form rows stay unambiguous.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<Value>>, file_name: impl Into<String>) -> Self {
        let headers = dedupe_headers(headers);
        let width = headers.len();
        let total = rows.len();
        let rows: Vec<Vec<Value>> = rows.into_iter().filter(|r| r.len() == width).collect();

        if rows.len() < total {
            debug!("Dropped {} rows not matching {} headers", total - rows.len(), width);
        }

        let metadata = TableMetadata {
            row_count: rows.len(),
            column_count: width,
            file_size: 0,
            file_name: file_name.into(),
            format: None,
        };

        Self { headers, rows, metadata }
    }

    /// Build a table from mapping-form rows.
    ///
    /// A record must hold exactly the header keys; any other record is dropped.
    pub fn from_records<'a, I>(headers: Vec<String>, records: I, file_name: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = &'a Record>,
    {
        let rows = records
            .into_iter()
            .filter_map(|record| {
                if record.len() != headers.len() {
                    return None;
                }
                headers.iter().map(|h| record.get(h).cloned()).collect::<Option<Vec<_>>>()
            })
            .collect();

        Self::new(headers, rows, file_name)
    }

    /// Record the byte size of the source content
    pub fn with_file_size(mut self, size: u64) -> Self {
        self.metadata.file_size = size;
        self
    }

    pub fn with_format(mut self, format: SourceFormat) -> Self {
        self.metadata.format = Some(format);
        self
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn metadata(&self) -> &TableMetadata {
        &self.metadata
    }

    pub fn row_count(&self) -> usize {
        self.metadata.row_count
    }

    pub fn column_count(&self) -> usize {
        self.metadata.column_count
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Cells of the column at `idx`, in row order
    pub fn column_values(&self, idx: usize) -> impl Iterator<Item = &Value> + '_ {
        self.rows.iter().filter_map(move |row| row.get(idx))
    }

    /// Cells of the named column, or `None` for an unknown column
    pub fn column(&self, name: &str) -> Option<impl Iterator<Item = &Value> + '_> {
        self.column_index(name).map(|idx| self.column_values(idx))
    }

    /// Mapping-form view of one row
    pub fn record(&self, idx: usize) -> Option<Record> {
        self.rows.get(idx).map(|row| self.to_record(row))
    }

    /// Mapping-form view of every row
    pub fn records(&self) -> impl Iterator<Item = Record> + '_ {
        self.rows.iter().map(|row| self.to_record(row))
    }

    fn to_record(&self, row: &[Value]) -> Record {
        self.headers.iter().cloned().zip(row.iter().cloned()).collect()
    }
}

fn dedupe_headers(headers: Vec<String>) -> Vec<String> {
    let mut seen: Vec<String> = Vec::with_capacity(headers.len());
    for header in headers {
        let mut candidate = header.clone();
        let mut suffix = 1;
        while seen.contains(&candidate) {
            candidate = format!("{}_{}", header, suffix);
            suffix += 1;
        }
        seen.push(candidate);
    }
    seen
}

/// Result of a mini-SQL query: the projected columns and one record per row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryResult {
    columns: Vec<String>,
    data: Vec<Record>,
}

impl QueryResult {
    /// Every record must carry exactly `columns`, in order
    pub fn new(columns: Vec<String>, data: Vec<Record>) -> Self {
        debug_assert!(data
            .iter()
            .all(|r| r.len() == columns.len() && r.keys().zip(&columns).all(|(k, c)| k == c)));
        Self { columns, data }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn data(&self) -> &[Record] {
        &self.data
    }

    pub fn row_count(&self) -> usize {
        self.data.len()
    }

    /// Turn the result into a standalone table
    pub fn into_table(self, name: impl Into<String>) -> Table {
        Table::from_records(self.columns, &self.data, name)
    }
}
