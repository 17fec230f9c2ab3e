//! Column type classification, data-quality checks and summary statistics
//!
//! Nothing here fails: empty tables produce empty reports.

pub mod typed;

use ahash::AHashSet;
use dv_core::{Table, Value};
use itertools::Itertools;
use serde::Serialize;
use tracing::debug;

use crate::config::MissingValues;

/// Share of missing cells above which a column is flagged
const HIGH_MISSING_PERCENT: f64 = 20.0;

/// Distinct values listed for categorical columns
const TOP_VALUES: usize = 5;

/// Inferred column type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Numeric,
    Categorical,
}

/// Computed view of a column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InferredColumn {
    pub name: String,
    pub kind: ColumnKind,
}

/// Issues found by [`ColumnProfiler::infer_quality`] with matching suggestions
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QualityReport {
    pub issues: Vec<String>,
    pub suggestions: Vec<String>,
}

impl QualityReport {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    fn flag(&mut self, label: &str, columns: &[&str], suggestion: &str) {
        if columns.is_empty() {
            return;
        }
        self.issues.push(format!("{}: {}", label, columns.join(", ")));
        self.suggestions.push(suggestion.to_string());
    }
}

/// Per-column summary statistics
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ColumnStat {
    Numeric {
        column: String,
        count: usize,
        /// Rounded to two decimals
        mean: f64,
        median: f64,
        min: f64,
        max: f64,
        missing: usize,
    },
    Categorical {
        column: String,
        count: usize,
        unique: usize,
        missing: usize,
        #[serde(rename = "topValues")]
        top_values: Vec<Value>,
    },
}

impl ColumnStat {
    pub fn column(&self) -> &str {
        match self {
            ColumnStat::Numeric { column, .. } | ColumnStat::Categorical { column, .. } => column,
        }
    }

    pub fn kind(&self) -> ColumnKind {
        match self {
            ColumnStat::Numeric { .. } => ColumnKind::Numeric,
            ColumnStat::Categorical { .. } => ColumnKind::Categorical,
        }
    }

    pub fn missing(&self) -> usize {
        match self {
            ColumnStat::Numeric { missing, .. } | ColumnStat::Categorical { missing, .. } => *missing,
        }
    }
}

/// Profiles table columns under a missing-value policy
#[derive(Debug, Clone, Default)]
pub struct ColumnProfiler {
    missing: MissingValues,
}

impl ColumnProfiler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_missing_values(mut self, missing: MissingValues) -> Self {
        self.missing = missing;
        self
    }

    pub fn is_missing(&self, value: &Value) -> bool {
        self.missing.is_missing(value)
    }

    /// Non-missing cells of column `idx`
    fn present<'a>(&'a self, table: &'a Table, idx: usize) -> impl Iterator<Item = &'a Value> + 'a {
        table.column_values(idx).filter(move |v| !self.missing.is_missing(v))
    }

    /// Numbers of column `idx` if every present cell coerces and there is at least one
    fn numeric_values(&self, table: &Table, idx: usize) -> Option<Vec<f64>> {
        let values: Option<Vec<f64>> = self.present(table, idx).map(Value::as_f64).collect();
        values.filter(|v| !v.is_empty())
    }

    /// Classify every column as numeric or categorical
    pub fn classify(&self, table: &Table) -> Vec<InferredColumn> {
        table
            .headers()
            .iter()
            .enumerate()
            .map(|(idx, name)| InferredColumn {
                name: name.clone(),
                kind: if self.numeric_values(table, idx).is_some() {
                    ColumnKind::Numeric
                } else {
                    ColumnKind::Categorical
                },
            })
            .collect()
    }

    /// Detect empty, mostly-missing and mixed-type columns
    pub fn infer_quality(&self, table: &Table) -> QualityReport {
        let mut report = QualityReport::default();
        let total = table.row_count();
        if total == 0 {
            return report;
        }

        let mut empty = Vec::new();
        let mut high_missing = Vec::new();
        let mut mixed = Vec::new();

        for (idx, header) in table.headers().iter().enumerate() {
            let missing = table.column_values(idx).filter(|v| self.missing.is_missing(v)).count();
            if missing == total {
                empty.push(header.as_str());
            }
            if missing as f64 / total as f64 * 100.0 > HIGH_MISSING_PERCENT {
                high_missing.push(header.as_str());
            }

            let types: AHashSet<&'static str> = self.present(table, idx).map(Value::type_name).collect();
            if types.len() > 1 {
                mixed.push(header.as_str());
            }
        }

        report.flag(
            "Empty columns detected",
            &empty,
            "Consider removing empty columns or filling with default values",
        );
        report.flag(
            "High missing values in",
            &high_missing,
            "Consider data imputation or column removal for high missing value columns",
        );
        report.flag(
            "Mixed data types in",
            &mixed,
            "Ensure consistent data types within columns",
        );

        debug!(
            "Quality check on {}: {} issues",
            table.metadata().file_name(),
            report.issues.len()
        );

        report
    }

    /// Summary statistics for every column
    pub fn compute_stats(&self, table: &Table) -> Vec<ColumnStat> {
        table
            .headers()
            .iter()
            .enumerate()
            .map(|(idx, header)| self.column_stat(table, idx, header))
            .collect()
    }

    fn column_stat(&self, table: &Table, idx: usize, header: &str) -> ColumnStat {
        let present: Vec<&Value> = self.present(table, idx).collect();
        let missing = table.row_count() - present.len();

        if let Some(mut numbers) = self.numeric_values(table, idx) {
            numbers.sort_by(f64::total_cmp);
            let count = numbers.len();
            let mean = numbers.iter().sum::<f64>() / count as f64;

            return ColumnStat::Numeric {
                column: header.to_string(),
                count,
                mean: round2(mean),
                median: numbers[count / 2],
                min: numbers[0],
                max: numbers[count - 1],
                missing,
            };
        }

        let distinct: Vec<&Value> = present.iter().copied().unique_by(|v| value_key(v)).collect();

        ColumnStat::Categorical {
            column: header.to_string(),
            count: present.len(),
            unique: distinct.len(),
            missing,
            top_values: distinct.into_iter().take(TOP_VALUES).cloned().collect(),
        }
    }
}

/// Identity of a value for distinct counting; `1` and `"1"` stay distinct
pub(crate) fn value_key(value: &Value) -> (&'static str, String) {
    (value.type_name(), value.to_string())
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Quality report with the default missing-value policy
pub fn infer_quality(table: &Table) -> QualityReport {
    ColumnProfiler::new().infer_quality(table)
}

/// Column statistics with the default missing-value policy
pub fn compute_stats(table: &Table) -> Vec<ColumnStat> {
    ColumnProfiler::new().compute_stats(table)
}

/// Column classification with the default missing-value policy
pub fn classify(table: &Table) -> Vec<InferredColumn> {
    ColumnProfiler::new().classify(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(headers: &[&str], rows: Vec<Vec<Value>>) -> Table {
        Table::new(headers.iter().map(|h| h.to_string()).collect(), rows, "t.csv")
    }

    fn s(v: &str) -> Value {
        Value::from(v)
    }

    #[test]
    fn test_numeric_stats() {
        let t = table(
            &["x"],
            ["3", "1", "", "4", "2"].iter().map(|v| vec![s(v)]).collect(),
        );
        let stats = compute_stats(&t);
        assert_eq!(
            stats[0],
            ColumnStat::Numeric {
                column: "x".into(),
                count: 4,
                mean: 2.5,
                median: 3.0,
                min: 1.0,
                max: 4.0,
                missing: 1,
            }
        );
    }

    #[test]
    fn test_mean_is_rounded() {
        let t = table(&["x"], ["1", "1", "2"].iter().map(|v| vec![s(v)]).collect());
        match &compute_stats(&t)[0] {
            ColumnStat::Numeric { mean, .. } => assert_eq!(*mean, 1.33),
            other => panic!("expected numeric, got {:?}", other),
        }
    }

    #[test]
    fn test_one_non_numeric_value_makes_categorical() {
        let t = table(
            &["x"],
            ["a", "b", "a", "1", "c", "d", "e", ""].iter().map(|v| vec![s(v)]).collect(),
        );
        match &compute_stats(&t)[0] {
            ColumnStat::Categorical {
                count,
                unique,
                missing,
                top_values,
                ..
            } => {
                assert_eq!(*count, 7);
                assert_eq!(*unique, 6);
                assert_eq!(*missing, 1);
                assert_eq!(top_values, &vec![s("a"), s("b"), s("1"), s("c"), s("d")]);
            }
            other => panic!("expected categorical, got {:?}", other),
        }
    }

    #[test]
    fn test_all_missing_column_is_categorical() {
        let t = table(&["x"], vec![vec![s("")], vec![Value::Null]]);
        assert_eq!(classify(&t)[0].kind, ColumnKind::Categorical);
        assert_eq!(compute_stats(&t)[0].missing(), 2);
    }

    #[test]
    fn test_quality_issues() {
        let t = table(
            &["id", "empty", "sparse", "mixed"],
            vec![
                vec![s("1"), s(""), s(""), Value::Number(1.0)],
                vec![s("2"), s(""), s("x"), s("one")],
                vec![s("3"), Value::Null, s("y"), Value::Null],
                vec![s("4"), s(""), s("z"), Value::Number(4.0)],
            ],
        );
        let report = infer_quality(&t);
        assert_eq!(
            report.issues,
            vec![
                "Empty columns detected: empty".to_string(),
                "High missing values in: empty, sparse, mixed".to_string(),
                "Mixed data types in: mixed".to_string(),
            ]
        );
        assert_eq!(report.suggestions.len(), 3);
        assert_eq!(
            report.suggestions[0],
            "Consider removing empty columns or filling with default values"
        );
    }

    #[test]
    fn test_exactly_twenty_percent_not_flagged() {
        let rows = (0..5).map(|i| vec![if i == 0 { s("") } else { s("v") }]).collect();
        assert!(infer_quality(&table(&["c"], rows)).is_clean());
    }

    #[test]
    fn test_empty_table_is_clean() {
        let t = table(&["a", "b"], vec![]);
        assert!(infer_quality(&t).is_clean());
        assert_eq!(compute_stats(&t).len(), 2);
    }

    #[test]
    fn test_lenient_missing_values() {
        let t = table(&["x"], vec![vec![s("N/A")], vec![s("5")], vec![s("7")]]);
        assert_eq!(classify(&t)[0].kind, ColumnKind::Categorical);

        let profiler = ColumnProfiler::new().with_missing_values(MissingValues::lenient());
        assert_eq!(profiler.classify(&t)[0].kind, ColumnKind::Numeric);
    }

    #[test]
    fn test_stats_serialize_shape() {
        let t = table(&["c"], vec![vec![s("a")]]);
        let json = serde_json::to_value(&compute_stats(&t)[0]).unwrap();
        assert_eq!(json["type"], "categorical");
        assert_eq!(json["topValues"][0], "a");
    }
}
