//! Typed Arrow view over a table
//!
//! The table keeps its raw cells; this builds a separate columnar batch using
//! the inferred column kinds.

use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::{RecordBatch, RecordBatchOptions};
use dv_core::Table;

use super::{ColumnKind, ColumnProfiler};
use crate::DataError;

/// Convert with the default missing-value policy
pub fn to_record_batch(table: &Table) -> Result<RecordBatch, DataError> {
    to_record_batch_with(table, &ColumnProfiler::new())
}

/// Numeric columns become `Float64`, everything else `Utf8`; missing cells are null
pub fn to_record_batch_with(table: &Table, profiler: &ColumnProfiler) -> Result<RecordBatch, DataError> {
    let kinds = profiler.classify(table);
    let mut fields = Vec::with_capacity(kinds.len());
    let mut columns: Vec<ArrayRef> = Vec::with_capacity(kinds.len());

    for (idx, column) in kinds.iter().enumerate() {
        match column.kind {
            ColumnKind::Numeric => {
                let values: Vec<Option<f64>> = table
                    .column_values(idx)
                    .map(|v| if profiler.is_missing(v) { None } else { v.as_f64() })
                    .collect();
                fields.push(Field::new(&column.name, DataType::Float64, true));
                columns.push(Arc::new(Float64Array::from(values)));
            }
            ColumnKind::Categorical => {
                let values: Vec<Option<String>> = table
                    .column_values(idx)
                    .map(|v| if profiler.is_missing(v) { None } else { Some(v.to_string()) })
                    .collect();
                fields.push(Field::new(&column.name, DataType::Utf8, true));
                columns.push(Arc::new(StringArray::from(values)));
            }
        }
    }

    let options = RecordBatchOptions::new().with_row_count(Some(table.row_count()));
    let batch = RecordBatch::try_new_with_options(Arc::new(Schema::new(fields)), columns, &options)?;
    Ok(batch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::Array;
    use dv_core::Value;

    #[test]
    fn test_typed_columns() {
        let table = Table::new(
            vec!["name".into(), "age".into()],
            vec![
                vec![Value::from("Alice"), Value::from("30")],
                vec![Value::from(""), Value::from("")],
                vec![Value::from("Bob"), Value::from("25.5")],
            ],
            "t.csv",
        );
        let batch = to_record_batch(&table).unwrap();

        assert_eq!(batch.num_rows(), 3);
        assert_eq!(batch.schema().field(0).data_type(), &DataType::Utf8);
        assert_eq!(batch.schema().field(1).data_type(), &DataType::Float64);

        let ages = batch.column(1).as_any().downcast_ref::<Float64Array>().unwrap();
        assert_eq!(ages.value(0), 30.0);
        assert!(ages.is_null(1));
        assert_eq!(ages.value(2), 25.5);

        // source cells are untouched
        assert_eq!(table.rows()[0][1], Value::from("30"));
    }

    #[test]
    fn test_zero_column_table() {
        let table = Table::new(vec![], vec![], "t");
        let batch = to_record_batch(&table).unwrap();
        assert_eq!(batch.num_columns(), 0);
    }
}
