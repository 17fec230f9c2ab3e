//! Renderable chart data

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::CoreError;

/// Label shown when a chart has nothing to plot
pub const NO_DATA_LABEL: &str = "No Data";

/// Chart kinds the synthesizer understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Pie,
    Bar,
    Scatter,
    Line,
}

impl ChartKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChartKind::Pie => "pie",
            ChartKind::Bar => "bar",
            ChartKind::Scatter => "scatter",
            ChartKind::Line => "line",
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChartKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pie" => Ok(ChartKind::Pie),
            "bar" => Ok(ChartKind::Bar),
            "scatter" => Ok(ChartKind::Scatter),
            "line" => Ok(ChartKind::Line),
            other => Err(CoreError::UnknownVariant {
                kind: "chart kind",
                value: other.to_string(),
            }),
        }
    }
}

/// Parallel label/value arrays handed to a chart renderer.
///
/// `labels` and `values` always have the same length.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    labels: Vec<String>,
    values: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    colors: Option<Vec<String>>,
}

impl ChartData {
    /// Pair labels with values, truncating to the shorter of the two
    pub fn new(mut labels: Vec<String>, mut values: Vec<f64>) -> Self {
        let len = labels.len().min(values.len());
        labels.truncate(len);
        values.truncate(len);
        Self {
            labels,
            values,
            colors: None,
        }
    }

    /// The single-slice placeholder used for empty or degenerate input
    pub fn no_data() -> Self {
        Self::new(vec![NO_DATA_LABEL.to_string()], vec![0.0])
    }

    pub fn with_colors(mut self, colors: Vec<String>) -> Self {
        self.colors = Some(colors);
        self
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn colors(&self) -> Option<&[String]> {
        self.colors.as_deref()
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn is_no_data(&self) -> bool {
        self.labels.len() == 1 && self.labels[0] == NO_DATA_LABEL && self.values[0] == 0.0
    }

    /// Iterate `(label, value)` pairs
    pub fn points(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.labels.iter().map(String::as_str).zip(self.values.iter().copied())
    }
}
