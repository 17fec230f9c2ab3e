//! CSV parsing

use csv::{ReaderBuilder, StringRecord};
use dv_core::{SourceFormat, Table, Value};
use tracing::{debug, info};

use crate::DataError;

/// Delimiters tried by [`sniff_delimiter`], in tie-break order
const CANDIDATE_DELIMITERS: [u8; 4] = [b',', b'\t', b';', b'|'];

/// Records inspected when sniffing the delimiter
const SNIFF_SAMPLE_RECORDS: usize = 20;

/// CSV parser. The first record is always the header row.
#[derive(Debug, Clone, Default)]
pub struct CsvSource {
    /// Delimiter override; sniffed from the content when `None`
    delimiter: Option<u8>,
}

impl CsvSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a fixed delimiter instead of sniffing one
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = Some(delimiter);
        self
    }

    /// Parse CSV content into a table of string cells
    pub fn parse(&self, content: &[u8], file_name: &str) -> Result<Table, DataError> {
        let text = std::str::from_utf8(content).map_err(|e| DataError::processing("CSV", e))?;
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);

        if text.trim().is_empty() {
            return Err(DataError::EmptyFile);
        }

        let delimiter = self.delimiter.unwrap_or_else(|| sniff_delimiter(text));
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(delimiter)
            .from_reader(text.as_bytes());

        let mut records = reader.records();

        let header_record = match records.next() {
            Some(record) => record?,
            None => return Err(DataError::EmptyFile),
        };
        let headers: Vec<String> = header_record.iter().map(|h| h.trim().to_string()).collect();
        if headers.iter().all(|h| h.is_empty()) {
            return Err(DataError::NoHeaders);
        }

        let mut rows = Vec::new();
        let mut blank = 0usize;
        let mut malformed = 0usize;

        for result in records {
            let record = result?;
            if is_blank_record(&record) {
                blank += 1;
                continue;
            }
            if record.len() != headers.len() {
                malformed += 1;
                continue;
            }
            rows.push(record.iter().map(Value::from).collect::<Vec<_>>());
        }

        if blank > 0 || malformed > 0 {
            debug!(
                "{}: skipped {} blank and {} malformed rows (expected {} fields)",
                file_name,
                blank,
                malformed,
                headers.len()
            );
        }

        let table = Table::new(headers, rows, file_name)
            .with_file_size(content.len() as u64)
            .with_format(SourceFormat::Csv);

        info!(
            "Parsed CSV {}: {} rows, {} columns (delimiter {:?})",
            file_name,
            table.row_count(),
            table.column_count(),
            delimiter as char
        );

        Ok(table)
    }
}

fn is_blank_record(record: &StringRecord) -> bool {
    record.iter().all(|cell| cell.is_empty())
}

/// Pick the delimiter that splits the leading records most consistently.
///
/// A candidate scores the number of sampled records whose field count matches
/// the first record's, and scores zero when the first record has a single
/// field. Ties go to the earlier candidate; with no winner the comma is used.
pub fn sniff_delimiter(text: &str) -> u8 {
    let mut best = (b',', 0usize);

    for &candidate in &CANDIDATE_DELIMITERS {
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(candidate)
            .from_reader(text.as_bytes());

        let counts: Vec<usize> = reader
            .records()
            .take(SNIFF_SAMPLE_RECORDS)
            .map_while(Result::ok)
            .filter(|r| !is_blank_record(r))
            .map(|r| r.len())
            .collect();

        let score = match counts.first() {
            Some(&first) if first > 1 => counts.iter().filter(|&&c| c == first).count(),
            _ => 0,
        };

        if score > best.1 {
            best = (candidate, score);
        }
    }

    best.0
}
