//! Point samples for scatter and line charts

use dv_core::{ChartData, Table};

/// Rows sampled from the top of the table
pub const SAMPLE_ROWS: usize = 10;

fn point_labels(len: usize) -> Vec<String> {
    (1..=len).map(|i| format!("Point {}", i)).collect()
}

/// Numeric `y_column` values over the first [`SAMPLE_ROWS`] rows.
///
/// Without a y column, `x_column` supplies the values. Points are labelled
/// positionally; when nothing numeric remains the chart is a single zero
/// point.
pub fn point_chart(table: &Table, x_column: &str, y_column: Option<&str>) -> ChartData {
    let y_column = y_column.unwrap_or(x_column);
    let (Some(_), Some(y_idx)) = (table.column_index(x_column), table.column_index(y_column)) else {
        return ChartData::no_data();
    };

    let values: Vec<f64> = table
        .rows()
        .iter()
        .take(SAMPLE_ROWS)
        .filter_map(|row| row[y_idx].as_f64())
        .collect();

    if values.is_empty() {
        return ChartData::new(point_labels(1), vec![0.0]);
    }

    ChartData::new(point_labels(values.len()), values)
}
