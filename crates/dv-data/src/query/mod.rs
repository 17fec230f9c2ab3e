//! Single-table query interpreter
//!
//! Supports exactly `SELECT cols|* FROM t [WHERE col = val]
//! [ORDER BY col [ASC|DESC]] [LIMIT n]`. There is no GROUP BY, no
//! aggregation, no joins and no parenthesized expressions; anything outside
//! this subset is rejected rather than approximated.

mod lexer;
mod parser;

use dv_core::{QueryResult, Record, Table, Value};
use tracing::debug;

use crate::DataError;

pub use parser::parse_query;

/// Columns selected by a query
#[derive(Debug, Clone, PartialEq)]
pub enum Projection {
    All,
    Columns(Vec<String>),
}

/// Right-hand side of a `WHERE col = value` clause
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// Unquoted value; compared numerically when it parses as a number
    Bare(String),
    /// Quoted value; compared against the cell's text
    Quoted(String),
}

impl Literal {
    pub fn matches(&self, cell: &Value) -> bool {
        match self {
            Literal::Bare(raw) => match raw.parse::<f64>() {
                Ok(n) if n.is_finite() => cell.as_f64() == Some(n),
                _ => !cell.is_null() && cell.to_string() == *raw,
            },
            Literal::Quoted(text) => !cell.is_null() && cell.to_string() == *text,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub column: String,
    pub value: Literal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy {
    pub column: String,
    pub direction: SortDirection,
}

/// A parsed query
#[derive(Debug, Clone, PartialEq)]
pub struct SelectQuery {
    pub projection: Projection,
    /// Named table; ignored at evaluation since there is a single table
    pub table: String,
    pub filter: Option<Filter>,
    pub order_by: Option<OrderBy>,
    pub limit: Option<usize>,
}

impl SelectQuery {
    /// Evaluate against `table`: filter, then sort, then project, then limit
    ///
    /// ORDER BY compares the stored cells, so a column imported as text sorts
    /// lexically even when WHERE coerces it to numbers. Convert through
    /// [`crate::schema::typed::to_record_batch`] for numeric ordering.
    pub fn evaluate(&self, table: &Table) -> Result<QueryResult, DataError> {
        let columns = self.output_columns(table)?;
        let projected: Vec<usize> = columns.iter().map(|c| resolve(table, c)).collect::<Result<_, _>>()?;
        let filter = match &self.filter {
            Some(f) => Some((resolve(table, &f.column)?, &f.value)),
            None => None,
        };
        let order = match &self.order_by {
            Some(o) => Some((resolve(table, &o.column)?, o.direction)),
            None => None,
        };

        let mut rows: Vec<&Vec<Value>> = table
            .rows()
            .iter()
            .filter(|row| filter.map_or(true, |(idx, literal)| literal.matches(&row[idx])))
            .collect();

        if let Some((idx, direction)) = order {
            rows.sort_by(|a, b| {
                let ordering = a[idx].compare(&b[idx]);
                match direction {
                    SortDirection::Ascending => ordering,
                    SortDirection::Descending => ordering.reverse(),
                }
            });
        }

        let limit = self.limit.unwrap_or(rows.len()).min(rows.len());
        let data: Vec<Record> = rows
            .into_iter()
            .take(limit)
            .map(|row| {
                columns
                    .iter()
                    .zip(&projected)
                    .map(|(name, &idx)| (name.clone(), row[idx].clone()))
                    .collect()
            })
            .collect();

        debug!("Query on {} returned {} rows", table.metadata().file_name(), data.len());

        Ok(QueryResult::new(columns, data))
    }

    fn output_columns(&self, table: &Table) -> Result<Vec<String>, DataError> {
        match &self.projection {
            Projection::All => Ok(table.headers().to_vec()),
            Projection::Columns(requested) => {
                let mut columns: Vec<String> = Vec::with_capacity(requested.len());
                for column in requested {
                    resolve(table, column)?;
                    if !columns.contains(column) {
                        columns.push(column.clone());
                    }
                }
                Ok(columns)
            }
        }
    }
}

fn resolve(table: &Table, column: &str) -> Result<usize, DataError> {
    table.column_index(column).ok_or_else(|| DataError::UnknownColumn {
        column: column.to_string(),
        available: table.headers().to_vec(),
    })
}

/// Parse and evaluate `query` against `table`
pub fn execute(query: &str, table: &Table) -> Result<QueryResult, DataError> {
    parse_query(query)?.evaluate(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn people() -> Table {
        Table::new(
            vec!["Name".into(), "Age".into()],
            vec![
                vec![Value::from("Alice"), Value::Number(30.0)],
                vec![Value::from("Bob"), Value::Number(25.0)],
            ],
            "people",
        )
    }

    fn record(pairs: &[(&str, Value)]) -> Record {
        pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
    }

    #[test]
    fn test_where_with_limit() {
        let result = execute("SELECT Age FROM dataset WHERE Age = 30 LIMIT 5;", &people()).unwrap();
        assert_eq!(result.columns(), &["Age"]);
        assert_eq!(result.data(), &[record(&[("Age", Value::Number(30.0))])]);
    }

    #[test]
    fn test_unknown_order_column() {
        let err = execute("SELECT * FROM dataset ORDER BY Missing;", &people()).unwrap_err();
        match &err {
            DataError::UnknownColumn { column, available } => {
                assert_eq!(column, "Missing");
                assert_eq!(available, &vec!["Name".to_string(), "Age".to_string()]);
            }
            other => panic!("unexpected error {:?}", other),
        }
        assert_eq!(err.to_string(), "Column 'Missing' not found. Available columns: Name, Age");
    }

    #[test]
    fn test_unknown_projection_and_where_columns() {
        assert!(matches!(
            execute("SELECT Height FROM t", &people()),
            Err(DataError::UnknownColumn { .. })
        ));
        assert!(matches!(
            execute("SELECT * FROM t WHERE Height = 1", &people()),
            Err(DataError::UnknownColumn { .. })
        ));
    }

    #[test]
    fn test_order_by_desc_then_limit() {
        let table = Table::new(
            vec!["n".into(), "label".into()],
            ["3", "10", "2", "7"]
                .iter()
                .map(|v| vec![Value::Number(v.parse().unwrap()), Value::from(*v)])
                .collect(),
            "t",
        );

        let result = execute("SELECT n FROM t ORDER BY n DESC LIMIT 2", &table).unwrap();
        let values: Vec<&Value> = result.data().iter().map(|r| &r["n"]).collect();
        assert_eq!(values, vec![&Value::Number(10.0), &Value::Number(7.0)]);

        // text cells sort lexically
        let result = execute("SELECT label FROM t ORDER BY label", &table).unwrap();
        let labels: Vec<String> = result.data().iter().map(|r| r["label"].to_string()).collect();
        assert_eq!(labels, vec!["10", "2", "3", "7"]);
    }

    #[test]
    fn test_string_cells_match_bare_numbers() {
        let table = Table::new(
            vec!["Name".into(), "Age".into()],
            vec![vec![Value::from("Alice"), Value::from("30")], vec![Value::from("Bob"), Value::from("25")]],
            "t",
        );
        let result = execute("SELECT Name FROM t WHERE Age = 30.0", &table).unwrap();
        assert_eq!(result.row_count(), 1);

        let result = execute("SELECT * FROM t WHERE Name = 'Bob'", &table).unwrap();
        assert_eq!(result.data()[0]["Age"], Value::from("25"));

        let result = execute("select * from t where Name = Bob", &table).unwrap();
        assert_eq!(result.row_count(), 1);
    }

    #[test]
    fn test_limit_larger_than_rows_and_zero() {
        assert_eq!(execute("SELECT * FROM t LIMIT 100", &people()).unwrap().row_count(), 2);
        assert_eq!(execute("SELECT * FROM t LIMIT 0", &people()).unwrap().row_count(), 0);
    }

    #[test]
    fn test_limit_beyond_usize_is_clamped() {
        let result = execute("SELECT * FROM t LIMIT 18446744073709551616", &people()).unwrap();
        assert_eq!(result.row_count(), 2);

        let err = execute("SELECT * FROM t LIMIT 2.5", &people()).unwrap_err();
        assert!(matches!(err, DataError::InvalidQuery(_)));
        assert!(execute("SELECT * FROM t LIMIT -1", &people()).is_err());
    }

    #[test]
    fn test_order_by_text_column_is_lexical() {
        let ages = Table::new(
            vec!["Age".into()],
            ["9", "10", "100"].iter().map(|v| vec![Value::from(*v)]).collect(),
            "ages",
        );
        let result = execute("SELECT Age FROM t ORDER BY Age DESC", &ages).unwrap();
        let sorted: Vec<String> = result.data().iter().map(|r| r["Age"].to_string()).collect();
        assert_eq!(sorted, vec!["9", "100", "10"]);
        assert_eq!(execute("SELECT Age FROM t WHERE Age = 10", &ages).unwrap().row_count(), 1);
    }

    #[test]
    fn test_projection_order_and_duplicates() {
        let result = execute("SELECT Age, Name, Age FROM t", &people()).unwrap();
        assert_eq!(result.columns(), &["Age", "Name"]);
        assert!(result.data().iter().all(|r| r.keys().eq(result.columns().iter())));
    }

    #[test]
    fn test_unsupported_statement() {
        let err = execute("DELETE FROM t", &people()).unwrap_err();
        assert_eq!(err.to_string(), "Only SELECT queries are supported");
    }

    #[test]
    fn test_deterministic() {
        let table = people();
        let q = "SELECT * FROM t ORDER BY Age";
        assert_eq!(execute(q, &table).unwrap(), execute(q, &table).unwrap());
    }
}
