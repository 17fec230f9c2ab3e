//! SQL script listing
//!
//! Scripts are not executed. Each non-blank, non-comment line becomes a row of
//! a two-column `SQL_Statement, Line_Number` table.

use dv_core::{SourceFormat, Table, Value};
use tracing::info;

use crate::DataError;

pub const STATEMENT_COLUMN: &str = "SQL_Statement";
pub const LINE_NUMBER_COLUMN: &str = "Line_Number";

#[derive(Debug, Clone, Default)]
pub struct SqlScriptSource;

impl SqlScriptSource {
    pub fn new() -> Self {
        Self
    }

    pub fn parse(&self, content: &[u8], file_name: &str) -> Result<Table, DataError> {
        let text = String::from_utf8_lossy(content);

        if text.trim().is_empty() {
            return Err(DataError::EmptyFile);
        }

        let rows: Vec<Vec<Value>> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with("--"))
            .enumerate()
            .map(|(idx, line)| vec![Value::from(line), Value::from(idx + 1)])
            .collect();

        let table = Table::new(
            vec![STATEMENT_COLUMN.to_string(), LINE_NUMBER_COLUMN.to_string()],
            rows,
            file_name,
        )
        .with_file_size(content.len() as u64)
        .with_format(SourceFormat::Sql);

        info!("Listed SQL script {}: {} statement lines", file_name, table.row_count());

        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comments_and_blanks_removed() {
        let script = "-- schema\nCREATE TABLE t (id INT);\n\n  -- seed\n  INSERT INTO t VALUES (1);  \n";
        let table = SqlScriptSource::new().parse(script.as_bytes(), "seed.sql").unwrap();

        assert_eq!(table.headers(), &["SQL_Statement", "Line_Number"]);
        assert_eq!(
            table.rows(),
            &[
                vec![Value::from("CREATE TABLE t (id INT);"), Value::Number(1.0)],
                vec![Value::from("INSERT INTO t VALUES (1);"), Value::Number(2.0)],
            ]
        );
        assert_eq!(table.metadata().file_size(), script.len() as u64);
    }

    #[test]
    fn test_only_comments_yields_no_rows() {
        let table = SqlScriptSource::new().parse(b"-- nothing here\n", "x.sql").unwrap();
        assert_eq!(table.row_count(), 0);
        assert_eq!(table.column_count(), 2);
    }

    #[test]
    fn test_whitespace_only() {
        assert!(matches!(
            SqlScriptSource::new().parse(b" \n \n", "x.sql"),
            Err(DataError::EmptyFile)
        ));
    }
}
