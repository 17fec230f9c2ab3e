//! Natural-language findings derived from an analytics report

use dv_core::format::humanize_label;
use itertools::Itertools;
use serde::Serialize;

use super::AnalyticsReport;

/// Factors named in the key-factor insight
const NAMED_FACTORS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    Summary,
    Trend,
    Recommendation,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insight {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: InsightKind,
    pub content: String,
    /// In `[0, 1]`
    pub confidence: f64,
}

impl Insight {
    fn new(id: &str, title: String, kind: InsightKind, content: String, confidence: f64) -> Self {
        Self {
            id: id.to_string(),
            title,
            kind,
            content,
            confidence,
        }
    }
}

pub(super) fn generate(report: &AnalyticsReport) -> Vec<Insight> {
    let target = humanize_label(&report.target);
    let mut insights = vec![overview(report, &target)];

    if !report.key_factors.is_empty() {
        let names = report.key_factors.iter().take(NAMED_FACTORS).map(|f| f.label.as_str()).join(", ");
        insights.push(Insight::new(
            "key-factors",
            format!("Key {} Factors", target),
            InsightKind::Recommendation,
            format!(
                "The strongest predictors of {} are: {}. Focus on these areas first.",
                target, names
            ),
            0.85,
        ));
    }

    if let Some(profile) = report.grouped_averages.first() {
        if let (Some(first), Some(last)) = (profile.averages.first(), profile.averages.last()) {
            if profile.averages.len() > 1 {
                insights.push(Insight::new(
                    "group-contrast",
                    format!("{} by {}", profile.label, target),
                    InsightKind::Trend,
                    format!(
                        "Records with {} {} average {:.1} {}, while those with {} {} average {:.1}.",
                        target, first.group, first.average, profile.label, target, last.group, last.average
                    ),
                    0.92,
                ));
            }
        }
    }

    insights
}

fn overview(report: &AnalyticsReport, target: &str) -> Insight {
    let title = format!("{} Overview", target);
    let content = match report.target_mean {
        Some(mean) => {
            let mut content = format!(
                "Analysis of {} records shows an average {} of {:.2}.",
                report.total_records, target, mean
            );
            let most_common = report
                .distribution
                .iter()
                .rev()
                .filter(|entry| !entry.value.is_blank())
                .max_by_key(|entry| entry.count);
            if let Some(entry) = most_common {
                content.push_str(&format!(
                    " The most common value is {} ({:.1}% of records).",
                    entry.value, entry.percentage
                ));
            }
            content
        }
        None => format!(
            "Analysis of {} records found no numeric {} values.",
            report.total_records, target
        ),
    };

    Insight::new("overview", title, InsightKind::Summary, content, 0.95)
}
