//! Command implementations behind the CLI
//!
//! Each command takes an already-imported table and returns a serializable
//! result; printing is left to `main`.

use std::path::Path;

use anyhow::{Context, Result};
use dv_core::{ChartData, ChartKind, QueryResult, Table};
use dv_data::schema::{ColumnKind, ColumnProfiler, ColumnStat};
use dv_data::sources::{import, FsContentProvider};
use dv_data::ImportConfig;
use dv_views::export::query_to_records;
use dv_views::stats::STUDENT_STRESS_FACTORS;
use dv_views::{DatasetRequirements, ExportOptions};
use serde_json::{json, Value as Json};
use tracing::info;

/// Read and parse `path` with the given import settings
pub async fn load(path: &Path, config: &ImportConfig) -> Result<Table> {
    let locator = path.to_string_lossy();
    let table = import(&FsContentProvider::new(), &locator, config)
        .await
        .with_context(|| format!("Failed to import {}", path.display()))?;
    Ok(table)
}

fn profiler(config: &ImportConfig) -> ColumnProfiler {
    ColumnProfiler::new().with_missing_values(config.missing_values.clone())
}

/// Metadata, inferred column kinds, quality report and a short preview
pub fn inspect(table: &Table, config: &ImportConfig, preview: usize) -> Json {
    let profiler = profiler(config);
    let preview: Vec<_> = table.records().take(preview).collect();
    json!({
        "metadata": table.metadata(),
        "size": dv_core::format::format_file_size(table.metadata().file_size()),
        "columns": profiler.classify(table),
        "quality": profiler.infer_quality(table),
        "preview": preview,
    })
}

pub fn stats(table: &Table, config: &ImportConfig) -> Vec<ColumnStat> {
    profiler(config).compute_stats(table)
}

pub fn chart(table: &Table, kind: ChartKind, x: &str, y: Option<&str>, colors: &[String]) -> ChartData {
    let colors = (!colors.is_empty()).then_some(colors);
    dv_views::synthesize_with_colors(table, kind, x, y, colors)
}

pub fn query(table: &Table, sql: &str) -> Result<QueryResult> {
    Ok(dv_data::execute(sql, table)?)
}

/// Analytics report, insights and charts. Without explicit factors the
/// candidates are the survey factor columns in student-stress mode, every
/// other numeric column otherwise.
pub fn analyze(table: &Table, config: &ImportConfig, target: &str, factors: &[String], student_stress: bool) -> Json {
    let candidates: Vec<String> = if !factors.is_empty() {
        factors.to_vec()
    } else if student_stress {
        STUDENT_STRESS_FACTORS.iter().map(|f| f.to_string()).collect()
    } else {
        profiler(config)
            .classify(table)
            .into_iter()
            .filter(|c| c.kind == ColumnKind::Numeric && c.name != target)
            .map(|c| c.name)
            .collect()
    };
    let candidates: Vec<&str> = candidates.iter().map(String::as_str).collect();

    let report = dv_views::analyze(table, target, &candidates);
    let insights = report.insights();
    let charts = report.charts();

    let mut result = json!({
        "report": report,
        "insights": insights,
        "charts": charts,
    });
    if student_stress {
        result["validation"] = json!(dv_views::validate_dataset(table, &DatasetRequirements::student_stress()));
    }
    result
}

/// Export the table, or the result of `sql` over it
pub fn export(table: &Table, sql: Option<&str>, options: &ExportOptions) -> Result<String> {
    let records = match sql {
        Some(sql) => query_to_records(&query(table, sql)?),
        None => dv_views::table_to_records(table),
    };
    let content = dv_views::export(&records, options)?;
    info!("Prepared {} export of {} records", options.format, records.len());
    Ok(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dv_views::ExportFormat;
    use std::io::Write;

    const SURVEY: &str = "stress_level,anxiety_level,sleep_quality,city\n\
                          0,2,5,Oslo\n\
                          1,10,3,Rome\n\
                          2,19,1,Oslo\n\
                          2,20,2,Lima\n";

    async fn survey() -> Table {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(SURVEY.as_bytes()).unwrap();
        load(file.path(), &ImportConfig::default()).await.unwrap()
    }

    #[tokio::test]
    async fn test_load_and_inspect() {
        let table = survey().await;
        assert_eq!(table.row_count(), 4);

        let summary = inspect(&table, &ImportConfig::default(), 2);
        assert_eq!(summary["metadata"]["rowCount"], 4);
        assert_eq!(summary["columns"][0]["kind"], "numeric");
        assert_eq!(summary["columns"][3]["kind"], "categorical");
        assert_eq!(summary["preview"].as_array().unwrap().len(), 2);
        assert!(summary["quality"]["issues"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_load_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = load(&dir.path().join("absent.csv"), &ImportConfig::default()).await.unwrap_err();
        assert!(err.to_string().contains("absent.csv"));
    }

    #[tokio::test]
    async fn test_chart_and_query() {
        let table = survey().await;
        let pie = chart(&table, ChartKind::Pie, "city", None, &[]);
        assert_eq!(pie.labels(), &["Oslo", "Rome", "Lima"]);
        assert!(pie.colors().is_some());

        let result = query(&table, "SELECT city FROM survey WHERE stress_level = 2 ORDER BY city").unwrap();
        assert_eq!(result.row_count(), 2);
        assert_eq!(result.data()[0]["city"].to_string(), "Lima");
    }

    #[tokio::test]
    async fn test_analyze_defaults_to_numeric_columns() {
        let table = survey().await;
        let result = analyze(&table, &ImportConfig::default(), "stress_level", &[], false);
        let factors = result["report"]["keyFactors"].as_array().unwrap();
        assert_eq!(factors.len(), 2);
        assert_eq!(factors[0]["column"], "anxiety_level");
        assert!(!result["insights"].as_array().unwrap().is_empty());
        assert_eq!(result["charts"][0]["labels"][0], "Level 0");
        assert!(result.get("validation").is_none());
    }

    #[test]
    fn test_analyze_student_stress_uses_survey_factors() {
        use dv_core::Value;

        let rows = [(0.0, 2.0, 1.0), (1.0, 10.0, 2.0), (2.0, 19.0, 3.0)];
        let table = Table::new(
            vec!["stress_level".into(), "anxiety_level".into(), "row_id".into()],
            rows.iter()
                .map(|&(s, a, id)| vec![Value::Number(s), Value::Number(a), Value::Number(id)])
                .collect(),
            "survey",
        );

        let result = analyze(&table, &ImportConfig::default(), "stress_level", &[], true);
        let factors: Vec<&str> = result["report"]["keyFactors"]
            .as_array()
            .unwrap()
            .iter()
            .map(|f| f["column"].as_str().unwrap())
            .collect();
        assert_eq!(factors, vec!["anxiety_level"]);
        assert!(!result["validation"].as_array().unwrap().is_empty());

        let explicit = analyze(&table, &ImportConfig::default(), "stress_level", &["row_id".to_string()], true);
        assert_eq!(explicit["report"]["keyFactors"][0]["column"], "row_id");
    }

    #[tokio::test]
    async fn test_export_query_result() {
        let table = survey().await;
        let options = ExportOptions::new(ExportFormat::Csv, "oslo");
        let csv = export(&table, Some("SELECT city, stress_level FROM t WHERE city = 'Oslo'"), &options).unwrap();
        assert_eq!(csv, "city,stress_level\nOslo,0\nOslo,2\n");
    }

    #[tokio::test]
    async fn test_stats() {
        let table = survey().await;
        let stats = stats(&table, &ImportConfig::default());
        assert_eq!(stats.len(), 4);
        assert_eq!(stats[0].kind(), ColumnKind::Numeric);
    }
}
