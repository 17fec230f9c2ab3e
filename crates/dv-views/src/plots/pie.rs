//! Pie slices from categorical frequencies

use dv_core::{ChartData, Table};
use indexmap::IndexMap;

/// Label used for `Null` cells
pub const UNKNOWN_LABEL: &str = "Unknown";

/// Count each distinct (stringified) value of `column` in first-seen order.
///
/// There is no cap on the slice count.
pub fn pie_chart(table: &Table, column: &str) -> ChartData {
    let Some(values) = table.column(column) else {
        return ChartData::no_data();
    };

    let mut counts: IndexMap<String, usize> = IndexMap::new();
    for value in values {
        let label = if value.is_null() {
            UNKNOWN_LABEL.to_string()
        } else {
            value.to_string()
        };
        *counts.entry(label).or_insert(0) += 1;
    }

    if counts.is_empty() {
        return ChartData::no_data();
    }

    let (labels, values): (Vec<String>, Vec<f64>) = counts.into_iter().map(|(label, n)| (label, n as f64)).unzip();
    ChartData::new(labels, values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dv_core::Value;

    fn single_column(values: Vec<Value>) -> Table {
        Table::new(vec!["x".into()], values.into_iter().map(|v| vec![v]).collect(), "t")
    }

    #[test]
    fn test_first_seen_counts() {
        let table = single_column(["A", "B", "A", "C", "A"].iter().map(|v| Value::from(*v)).collect());
        let chart = pie_chart(&table, "x");
        assert_eq!(chart.labels(), &["A", "B", "C"]);
        assert_eq!(chart.values(), &[3.0, 1.0, 1.0]);
    }

    #[test]
    fn test_null_is_unknown() {
        let table = single_column(vec![Value::Null, Value::Number(2.0), Value::Null]);
        let chart = pie_chart(&table, "x");
        assert_eq!(chart.labels(), &["Unknown", "2"]);
        assert_eq!(chart.values(), &[2.0, 1.0]);
    }

    #[test]
    fn test_missing_column_or_empty_table() {
        assert!(pie_chart(&single_column(vec![]), "x").is_no_data());
        assert!(pie_chart(&single_column(vec![Value::from("a")]), "nope").is_no_data());
    }
}
