//! Domain analytics over a target column
//!
//! Schema-agnostic: callers name the target column and the candidate factor
//! columns. All functions are total; empty or non-numeric input produces
//! zeros or empty lists, never NaN.

mod insights;

use dv_core::format::humanize_label;
use dv_core::{ChartData, Table, Value};
use indexmap::IndexMap;
use itertools::Itertools;
use serde::Serialize;
use tracing::{debug, info};

use crate::plots::utils::{mean, numeric_pairs, palette, pearson};

pub use insights::{Insight, InsightKind};

/// Number of factors kept by [`key_factors`]
pub const MAX_KEY_FACTORS: usize = 5;

/// Factor columns of the student stress survey
pub const STUDENT_STRESS_FACTORS: [&str; 10] = [
    "anxiety_level",
    "depression",
    "academic_performance",
    "study_load",
    "future_career_concerns",
    "peer_pressure",
    "bullying",
    "sleep_quality",
    "social_support",
    "self_esteem",
];

/// Count and share of one distinct value
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistributionEntry {
    pub value: Value,
    pub count: usize,
    /// Percent of all rows, `0` for an empty table
    pub percentage: f64,
}

/// Correlation of a candidate column with the target
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Factor {
    pub column: String,
    /// Humanized column name
    pub label: String,
    pub correlation: f64,
}

/// Mean of a value column over the rows of one group
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupAverage {
    pub group: Value,
    /// `0` when no row of the group has a numeric value
    pub average: f64,
    pub count: usize,
}

/// Averages of one factor column per target group
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FactorProfile {
    pub column: String,
    pub label: String,
    pub averages: Vec<GroupAverage>,
}

/// Everything [`analyze`] derives for a target column
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsReport {
    pub target: String,
    pub total_records: usize,
    pub target_mean: Option<f64>,
    pub distribution: Vec<DistributionEntry>,
    pub key_factors: Vec<Factor>,
    pub grouped_averages: Vec<FactorProfile>,
}

/// Identity used to group cells: numbers compare numerically so `2` and
/// `"2"` fall in the same group
fn group_key(value: &Value) -> String {
    match value.as_f64() {
        // `-0` and `0` share a group
        Some(n) => format!("#{}", n + 0.0),
        None => format!("${}", value),
    }
}

/// Pearson correlation between two columns over rows where both are numeric.
///
/// Unknown columns correlate as `0`.
pub fn correlation(table: &Table, a: &str, b: &str) -> f64 {
    match (table.column(a), table.column(b)) {
        (Some(xs), Some(ys)) => {
            let (xs, ys) = numeric_pairs(xs, ys);
            pearson(&xs, &ys)
        }
        _ => 0.0,
    }
}

/// Candidates ranked by absolute correlation with `target`, top [`MAX_KEY_FACTORS`].
///
/// Candidates missing from the table and the target itself are skipped.
pub fn key_factors(table: &Table, target: &str, candidates: &[&str]) -> Vec<Factor> {
    candidates
        .iter()
        .filter(|&&column| column != target)
        .filter(|&&column| {
            let present = table.has_column(column);
            if !present {
                debug!("Skipping factor {}: column not found", column);
            }
            present
        })
        .unique()
        .map(|&column| Factor {
            column: column.to_string(),
            label: humanize_label(column),
            correlation: correlation(table, column, target),
        })
        .sorted_by(|a, b| b.correlation.abs().total_cmp(&a.correlation.abs()))
        .take(MAX_KEY_FACTORS)
        .collect()
}

/// Mean of numeric `value_column` per group of `group_column`.
///
/// Groups are the distinct non-blank values in first-seen order, or `buckets`
/// when given. A group with no numeric values averages `0`.
pub fn grouped_averages(
    table: &Table,
    group_column: &str,
    value_column: &str,
    buckets: Option<&[Value]>,
) -> Vec<GroupAverage> {
    let (Some(group_idx), Some(value_idx)) = (table.column_index(group_column), table.column_index(value_column))
    else {
        return buckets
            .unwrap_or_default()
            .iter()
            .map(|group| GroupAverage {
                group: group.clone(),
                average: 0.0,
                count: 0,
            })
            .collect();
    };

    let mut groups: IndexMap<String, (Value, Vec<f64>)> = IndexMap::new();
    if let Some(buckets) = buckets {
        for bucket in buckets {
            groups.entry(group_key(bucket)).or_insert_with(|| (bucket.clone(), Vec::new()));
        }
    }

    for row in table.rows() {
        let group = &row[group_idx];
        if group.is_blank() {
            continue;
        }
        let key = group_key(group);
        if !groups.contains_key(&key) {
            if buckets.is_some() {
                continue;
            }
            groups.insert(key.clone(), (group.clone(), Vec::new()));
        }
        if let (Some(n), Some(entry)) = (row[value_idx].as_f64(), groups.get_mut(&key)) {
            entry.1.push(n);
        }
    }

    groups
        .into_values()
        .map(|(group, values)| GroupAverage {
            group,
            average: mean(&values).unwrap_or(0.0),
            count: values.len(),
        })
        .collect()
}

/// Counts and percentages of each distinct value of `column`, first-seen order
pub fn distribution(table: &Table, column: &str) -> Vec<DistributionEntry> {
    let Some(values) = table.column(column) else {
        return Vec::new();
    };

    let mut counts: IndexMap<String, (Value, usize)> = IndexMap::new();
    for value in values {
        counts.entry(group_key(value)).or_insert_with(|| (value.clone(), 0)).1 += 1;
    }

    let total = table.row_count();
    counts
        .into_values()
        .map(|(value, count)| DistributionEntry {
            value,
            count,
            percentage: if total == 0 { 0.0 } else { count as f64 / total as f64 * 100.0 },
        })
        .collect()
}

/// Mean of the numeric cells of `column`
pub fn column_mean(table: &Table, column: &str) -> Option<f64> {
    let values: Vec<f64> = table.column(column)?.filter_map(Value::as_f64).collect();
    mean(&values)
}

/// Percent of rows whose `column` equals `value`, `0` for an empty table
pub fn share_equal(table: &Table, column: &str, value: &Value) -> f64 {
    let Some(cells) = table.column(column) else {
        return 0.0;
    };
    if table.row_count() == 0 {
        return 0.0;
    }
    let key = group_key(value);
    let matching = cells.filter(|cell| group_key(cell) == key).count();
    matching as f64 / table.row_count() as f64 * 100.0
}

/// Correlations, distribution and per-group factor averages for `target`
pub fn analyze(table: &Table, target: &str, candidates: &[&str]) -> AnalyticsReport {
    let key_factors = key_factors(table, target, candidates);
    let distribution = distribution(table, target);

    let groups: Vec<Value> = distribution
        .iter()
        .filter(|entry| !entry.value.is_blank())
        .map(|entry| entry.value.clone())
        .collect();
    let grouped_averages = key_factors
        .iter()
        .map(|factor| FactorProfile {
            column: factor.column.clone(),
            label: factor.label.clone(),
            averages: grouped_averages(table, target, &factor.column, Some(&groups)),
        })
        .collect();

    info!(
        "Analyzed {} rows of {} against {} candidate factors",
        table.row_count(),
        target,
        candidates.len()
    );

    AnalyticsReport {
        target: target.to_string(),
        total_records: table.row_count(),
        target_mean: column_mean(table, target),
        distribution,
        key_factors,
        grouped_averages,
    }
}

impl AnalyticsReport {
    /// Short natural-language findings
    pub fn insights(&self) -> Vec<Insight> {
        insights::generate(self)
    }

    /// Chart-ready views of the report: a pie of the target distribution
    /// labelled `Level N`, then a bar of the first key factor averaged per
    /// target group. Either is left out when it has nothing to show.
    pub fn charts(&self) -> Vec<ChartData> {
        let mut charts = Vec::new();

        let (labels, counts): (Vec<String>, Vec<f64>) = self
            .distribution
            .iter()
            .filter(|entry| !entry.value.is_blank())
            .map(|entry| (format!("Level {}", entry.value), entry.count as f64))
            .unzip();
        if !labels.is_empty() {
            let colors = palette(labels.len());
            charts.push(ChartData::new(labels, counts).with_colors(colors));
        }

        if let Some(profile) = self.grouped_averages.first().filter(|p| !p.averages.is_empty()) {
            let target = humanize_label(&self.target);
            let (labels, averages): (Vec<String>, Vec<f64>) = profile
                .averages
                .iter()
                .map(|group| (format!("{} {}", target, group.group), group.average))
                .unzip();
            let colors = palette(labels.len());
            charts.push(ChartData::new(labels, averages).with_colors(colors));
        }

        charts
    }
}

/// Structural expectations checked by [`validate_dataset`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DatasetRequirements {
    pub required_columns: Vec<String>,
    pub min_columns: usize,
    pub target_column: Option<String>,
    /// Accepted target values; empty accepts anything
    pub allowed_target_values: Vec<Value>,
}

impl DatasetRequirements {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requirements of the student stress survey
    pub fn student_stress() -> Self {
        Self {
            required_columns: [
                "anxiety_level",
                "self_esteem",
                "mental_health_history",
                "depression",
                "stress_level",
                "academic_performance",
                "sleep_quality",
            ]
            .iter()
            .map(|c| c.to_string())
            .collect(),
            min_columns: 10,
            target_column: Some("stress_level".to_string()),
            allowed_target_values: vec![Value::Number(0.0), Value::Number(1.0), Value::Number(2.0)],
        }
    }
}

/// Check `table` against `requirements`; an empty list means valid
pub fn validate_dataset(table: &Table, requirements: &DatasetRequirements) -> Vec<String> {
    let mut errors = Vec::new();

    let missing: Vec<&str> = requirements
        .required_columns
        .iter()
        .filter(|c| !table.has_column(c))
        .map(String::as_str)
        .collect();
    if !missing.is_empty() {
        errors.push(format!("Missing required columns: {}", missing.join(", ")));
    }

    if table.row_count() == 0 {
        errors.push("Dataset contains no data rows".to_string());
    }

    if table.column_count() < requirements.min_columns {
        errors.push(format!(
            "Dataset should have at least {} columns for meaningful analysis",
            requirements.min_columns
        ));
    }

    if let Some(target) = &requirements.target_column {
        if let (Some(values), false) = (table.column(target), requirements.allowed_target_values.is_empty()) {
            let allowed: Vec<String> = requirements.allowed_target_values.iter().map(group_key).collect();
            let invalid = values.filter(|v| !allowed.contains(&group_key(v))).count();
            if invalid > 0 {
                errors.push(format!(
                    "Found {} rows with invalid {} values (should be {})",
                    invalid,
                    target,
                    requirements.allowed_target_values.iter().join(", ")
                ));
            }
        }
    }

    errors
}
