//! Chart-data synthesis
//!
//! Turns a table plus a chart kind into the small label/value structure a
//! renderer needs. Synthesis never fails: unknown columns and degenerate
//! input produce [`ChartData::no_data`].

pub mod histogram;
pub mod pie;
pub mod scatter;
pub mod utils;

use dv_core::{ChartData, ChartKind, Table};
use tracing::warn;

pub use histogram::{histogram_chart, Bucket};
pub use pie::pie_chart;
pub use scatter::point_chart;

/// Build chart data for `kind`, applying the default pie palette
pub fn synthesize(table: &Table, kind: ChartKind, x_column: &str, y_column: Option<&str>) -> ChartData {
    synthesize_with_colors(table, kind, x_column, y_column, None)
}

/// Like [`synthesize`], with caller-supplied colors passed through unchanged
pub fn synthesize_with_colors(
    table: &Table,
    kind: ChartKind,
    x_column: &str,
    y_column: Option<&str>,
    colors: Option<&[String]>,
) -> ChartData {
    let chart = match kind {
        ChartKind::Pie => pie_chart(table, x_column),
        ChartKind::Bar => histogram_chart(table, x_column),
        ChartKind::Scatter | ChartKind::Line => point_chart(table, x_column, y_column),
    };

    if chart.is_no_data() {
        warn!("No {} chart data for column '{}'", kind, x_column);
    }

    match (colors, kind) {
        (Some(colors), _) => chart.with_colors(colors.to_vec()),
        (None, ChartKind::Pie) => {
            let palette = utils::palette(chart.len());
            chart.with_colors(palette)
        }
        (None, _) => chart,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dv_core::Value;

    fn table() -> Table {
        Table::new(
            vec!["group".into(), "score".into()],
            [("A", 1.0), ("B", 2.0), ("A", 3.0), ("C", 4.0), ("A", 5.0)]
                .iter()
                .map(|(g, s)| vec![Value::from(*g), Value::Number(*s)])
                .collect(),
            "t",
        )
    }

    #[test]
    fn test_pie_gets_default_palette() {
        let chart = synthesize(&table(), ChartKind::Pie, "group", None);
        assert_eq!(chart.labels(), &["A", "B", "C"]);
        assert_eq!(chart.values(), &[3.0, 1.0, 1.0]);
        let colors = chart.colors().unwrap();
        assert_eq!(colors.len(), 3);
        assert_eq!(colors[0], utils::DEFAULT_PALETTE[0]);
    }

    #[test]
    fn test_other_kinds_have_no_default_colors() {
        for kind in [ChartKind::Bar, ChartKind::Scatter, ChartKind::Line] {
            assert!(synthesize(&table(), kind, "score", None).colors().is_none(), "{}", kind);
        }
    }

    #[test]
    fn test_caller_colors_pass_through() {
        let colors = vec!["red".to_string()];
        let chart = synthesize_with_colors(&table(), ChartKind::Bar, "score", None, Some(&colors));
        assert_eq!(chart.colors(), Some(&colors[..]));
    }

    #[test]
    fn test_labels_and_values_aligned() {
        let t = table();
        for kind in [ChartKind::Pie, ChartKind::Bar, ChartKind::Scatter, ChartKind::Line] {
            for column in ["group", "score", "missing"] {
                let chart = synthesize(&t, kind, column, Some("score"));
                assert_eq!(chart.labels().len(), chart.values().len());
            }
        }
    }

    #[test]
    fn test_unknown_column_is_no_data() {
        assert!(synthesize(&table(), ChartKind::Bar, "missing", None).is_no_data());
    }
}
