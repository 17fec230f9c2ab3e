//! Export of tabular results as JSON, CSV or plain text

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use dv_core::{QueryResult, Record, Table, Value};
use itertools::Itertools;
use serde::Serialize;
use thiserror::Error;
use tracing::info;

/// Version stamped into export metadata
pub const EXPORT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Longest file stem produced by [`sanitize_filename`]
const MAX_FILENAME_LEN: usize = 50;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Export format {0} is not supported")]
    UnsupportedFormat(ExportFormat),

    #[error("Unknown export format: '{0}'")]
    UnknownFormat(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Export format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Json,
    Csv,
    Txt,
    Xlsx,
    Pdf,
    Png,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
            ExportFormat::Txt => "txt",
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Pdf => "pdf",
            ExportFormat::Png => "png",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Json => "application/json",
            ExportFormat::Csv => "text/csv",
            ExportFormat::Txt => "text/plain",
            ExportFormat::Xlsx => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            ExportFormat::Pdf => "application/pdf",
            ExportFormat::Png => "image/png",
        }
    }

    /// Whether [`export`] can produce this format
    pub fn is_supported(&self) -> bool {
        matches!(self, ExportFormat::Json | ExportFormat::Csv | ExportFormat::Txt)
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().trim_start_matches('.').to_ascii_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            "txt" | "text" => Ok(ExportFormat::Txt),
            "xlsx" => Ok(ExportFormat::Xlsx),
            "pdf" => Ok(ExportFormat::Pdf),
            "png" => Ok(ExportFormat::Png),
            _ => Err(ExportError::UnknownFormat(s.to_string())),
        }
    }
}

/// Export options
#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub format: ExportFormat,
    /// Name recorded in metadata and used for the output file stem
    pub filename: String,
    /// CSV header row
    pub include_headers: bool,
    /// JSON `exportInfo` envelope and TXT banner
    pub include_metadata: bool,
}

impl ExportOptions {
    pub fn new(format: ExportFormat, filename: impl Into<String>) -> Self {
        Self {
            format,
            filename: filename.into(),
            include_headers: true,
            include_metadata: false,
        }
    }

    pub fn with_headers(mut self, include: bool) -> Self {
        self.include_headers = include;
        self
    }

    pub fn with_metadata(mut self, include: bool) -> Self {
        self.include_metadata = include;
        self
    }

    /// `<sanitized name>.<extension>`
    pub fn output_file_name(&self) -> String {
        format!("{}.{}", sanitize_filename(&self.filename), self.format.extension())
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ExportInfo<'a> {
    format: ExportFormat,
    filename: &'a str,
    exported_at: String,
    record_count: usize,
    version: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonExport<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    export_info: Option<ExportInfo<'a>>,
    data: &'a [Record],
}

/// Render `records` in the requested format, timestamped now
pub fn export(records: &[Record], options: &ExportOptions) -> Result<String, ExportError> {
    export_at(records, options, Utc::now())
}

/// Render `records` with an explicit export timestamp
pub fn export_at(records: &[Record], options: &ExportOptions, exported_at: DateTime<Utc>) -> Result<String, ExportError> {
    let timestamp = exported_at.to_rfc3339_opts(SecondsFormat::Millis, true);
    let content = match options.format {
        ExportFormat::Json => to_json(records, options, timestamp)?,
        ExportFormat::Csv => to_csv(records, options.include_headers),
        ExportFormat::Txt => to_txt(records, options, &timestamp),
        unsupported => return Err(ExportError::UnsupportedFormat(unsupported)),
    };

    info!(
        "Exported {} records as {} ({} bytes)",
        records.len(),
        options.format,
        content.len()
    );
    Ok(content)
}

fn to_json(records: &[Record], options: &ExportOptions, timestamp: String) -> Result<String, ExportError> {
    let export_info = options.include_metadata.then(|| ExportInfo {
        format: options.format,
        filename: &options.filename,
        exported_at: timestamp,
        record_count: records.len(),
        version: EXPORT_VERSION,
    });
    let document = JsonExport {
        export_info,
        data: records,
    };
    Ok(serde_json::to_string_pretty(&document)?)
}

fn csv_field(text: &str) -> String {
    if text.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", text.replace('"', "\"\""))
    } else {
        text.to_string()
    }
}

/// Columns come from the first record; other records are read by key
fn to_csv(records: &[Record], include_headers: bool) -> String {
    let Some(first) = records.first() else {
        return String::new();
    };
    let headers: Vec<&String> = first.keys().collect();

    let mut csv = String::new();
    if include_headers {
        csv.push_str(&headers.iter().map(|h| csv_field(h)).join(","));
        csv.push('\n');
    }

    for record in records {
        let line = headers
            .iter()
            .map(|&h| csv_field(&record.get(h).map(Value::to_string).unwrap_or_default()))
            .join(",");
        csv.push_str(&line);
        csv.push('\n');
    }

    csv
}

fn to_txt(records: &[Record], options: &ExportOptions, timestamp: &str) -> String {
    let mut txt = String::new();

    if options.include_metadata {
        txt.push_str("Dashly Data Export\n");
        txt.push_str(&format!("Exported: {}\n", timestamp));
        txt.push_str(&format!("Format: {}\n", options.format));
        txt.push_str(&format!("Records: {}\n", records.len()));
        txt.push_str(&format!("\n{}\n\n", "=".repeat(50)));
    }

    for (index, record) in records.iter().enumerate() {
        txt.push_str(&format!("Record {}:\n", index + 1));
        for (key, value) in record {
            txt.push_str(&format!("  {}: {}\n", key, value));
        }
        txt.push('\n');
    }

    txt
}

/// Replace non-alphanumerics with `_`, lowercase, and cap the length
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
        .take(MAX_FILENAME_LEN)
        .collect()
}

/// Mapping-form rows of a table
pub fn table_to_records(table: &Table) -> Vec<Record> {
    table.records().collect()
}

/// Rows of a query result
pub fn query_to_records(result: &QueryResult) -> Vec<Record> {
    result.data().to_vec()
}
