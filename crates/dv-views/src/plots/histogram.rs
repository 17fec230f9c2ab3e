//! Histogram buckets for numeric distributions
//!
//! Buckets are closed-open except the last, which also includes its upper
//! bound so the maximum is always counted.

use dv_core::{ChartData, Table};
use tracing::debug;

const MIN_BUCKETS: usize = 3;
const MAX_BUCKETS: usize = 5;

/// A single bucket with its bounds and membership count
#[derive(Debug, Clone, PartialEq)]
pub struct Bucket {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

impl Bucket {
    pub fn label(&self) -> String {
        format!("{:.1}-{:.1}", self.start, self.end)
    }
}

/// Bucket count for `n` numeric values
pub fn bucket_count(n: usize) -> usize {
    (n / 10).clamp(MIN_BUCKETS, MAX_BUCKETS)
}

/// Split `values` into equal-width buckets between their min and max
pub fn buckets(values: &[f64]) -> Vec<Bucket> {
    if values.is_empty() {
        return Vec::new();
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let num_buckets = bucket_count(values.len());
    let width = (max - min) / num_buckets as f64;

    let edge = |i: usize| if i == num_buckets { max } else { min + i as f64 * width };

    (0..num_buckets)
        .map(|i| {
            let last = i == num_buckets - 1;
            let (start, end) = (edge(i), edge(i + 1));
            let count = values
                .iter()
                .filter(|&&v| if last { v >= start && v <= end } else { v >= start && v < end })
                .count();
            Bucket { start, end, count }
        })
        .collect()
}

/// Bar chart of the numeric distribution of `column`; non-numeric cells are skipped
pub fn histogram_chart(table: &Table, column: &str) -> ChartData {
    let Some(cells) = table.column(column) else {
        return ChartData::no_data();
    };
    let values: Vec<f64> = cells.filter_map(|v| v.as_f64()).collect();
    if values.is_empty() {
        return ChartData::no_data();
    }

    let buckets = buckets(&values);
    debug!("Bucketed {} values of {} into {} buckets", values.len(), column, buckets.len());

    let (labels, counts): (Vec<String>, Vec<f64>) = buckets.iter().map(|b| (b.label(), b.count as f64)).unzip();
    ChartData::new(labels, counts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dv_core::Value;

    fn numbers(values: &[f64]) -> Table {
        Table::new(
            vec!["n".into()],
            values.iter().map(|v| vec![Value::Number(*v)]).collect(),
            "t",
        )
    }

    #[test]
    fn test_outlier_lands_in_last_bucket() {
        let chart = histogram_chart(&numbers(&[1.0, 2.0, 3.0, 4.0, 5.0, 100.0]), "n");
        assert_eq!(chart.labels(), &["1.0-34.0", "34.0-67.0", "67.0-100.0"]);
        assert_eq!(chart.values(), &[5.0, 0.0, 1.0]);
    }

    #[test]
    fn test_bucket_count_clamped() {
        assert_eq!(bucket_count(0), 3);
        assert_eq!(bucket_count(35), 3);
        assert_eq!(bucket_count(40), 4);
        assert_eq!(bucket_count(1000), 5);
    }

    #[test]
    fn test_counts_cover_every_value() {
        let values: Vec<f64> = (0..57).map(|i| (i as f64 * 7.3) % 19.0).collect();
        let total: usize = buckets(&values).iter().map(|b| b.count).sum();
        assert_eq!(total, values.len());
    }

    #[test]
    fn test_constant_column_goes_to_last_bucket() {
        let chart = histogram_chart(&numbers(&[4.0, 4.0, 4.0]), "n");
        assert_eq!(chart.values(), &[0.0, 0.0, 3.0]);
        assert_eq!(chart.labels()[2], "4.0-4.0");
    }

    #[test]
    fn test_no_numeric_values() {
        let table = Table::new(vec!["n".into()], vec![vec![Value::from("x")], vec![Value::Null]], "t");
        assert!(histogram_chart(&table, "n").is_no_data());
        assert!(histogram_chart(&table, "missing").is_no_data());
    }

    #[test]
    fn test_string_numbers_are_coerced() {
        let table = Table::new(
            vec!["n".into()],
            ["1", "2", "abc", "3"].iter().map(|v| vec![Value::from(*v)]).collect(),
            "t",
        );
        let chart = histogram_chart(&table, "n");
        assert_eq!(chart.values().iter().sum::<f64>(), 3.0);
    }
}
