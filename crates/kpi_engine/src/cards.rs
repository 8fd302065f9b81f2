use serde::Serialize;

use crate::format::{Tone, Trend};
use crate::metric::Metric;

/// How a card renders its numeric value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    Currency,
    Percent,
    Plain,
}

/// One KPI tile as shown on a dashboard and in an exported report.
#[derive(Debug, Clone, Serialize)]
pub struct KpiCard {
    pub title: String,
    pub value: String,
    pub description: String,
    pub category: String,
    pub tone: Tone,
    pub trend: Trend,
    pub raw: Metric,
}

impl KpiCard {
    /// Card whose colour and arrow follow the sign of `metric`.
    pub fn signed(
        title: &str,
        metric: Metric,
        kind: ValueKind,
        category: &str,
        description: &str,
    ) -> Self {
        let v = metric.unwrap_or(0.0);
        Self::new(title, metric, kind, category, description, Tone::of(v))
            .with_trend(Trend::of(v))
    }

    /// Card with a fixed accent colour and no trend arrow.
    pub fn new(
        title: &str,
        metric: Metric,
        kind: ValueKind,
        category: &str,
        description: &str,
        tone: Tone,
    ) -> Self {
        Self {
            title: title.to_string(),
            value: render_value(metric, kind),
            description: description.to_string(),
            category: category.to_string(),
            tone: if metric.is_available() { tone } else { Tone::Neutral },
            trend: Trend::Flat,
            raw: metric,
        }
    }

    /// Card whose value is free text (a customer id, a label).
    pub fn text(title: &str, value: &str, category: &str, description: &str) -> Self {
        Self {
            title: title.to_string(),
            value: value.to_string(),
            description: description.to_string(),
            category: category.to_string(),
            tone: Tone::Neutral,
            trend: Trend::Flat,
            raw: Metric::Unavailable,
        }
    }

    pub fn with_trend(mut self, trend: Trend) -> Self {
        self.trend = trend;
        self
    }

    /// Value with its trend arrow appended, e.g. `$1.20M↑`.
    pub fn display_value(&self) -> String {
        format!("{}{}", self.value, self.trend.glyph())
    }

    fn searchable_text(&self) -> String {
        [
            self.title.as_str(),
            self.description.as_str(),
            self.category.as_str(),
            self.value.as_str(),
        ]
        .iter()
        .filter(|s| !s.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
    }
}

fn render_value(metric: Metric, kind: ValueKind) -> String {
    match (metric, kind) {
        (Metric::Unavailable, _) => crate::format::NOT_AVAILABLE.to_string(),
        (Metric::Value(v), ValueKind::Currency) => crate::format::format_currency(v),
        (Metric::Value(v), ValueKind::Percent) => crate::format::format_percent(v),
        (Metric::Value(v), ValueKind::Plain) => crate::format::format_number(v),
    }
}

/// Case-insensitive substring search over title, description, category and value.
///
/// A blank criteria keeps every card.
pub fn filter_cards<'a>(cards: &'a [KpiCard], criteria: &str) -> Vec<&'a KpiCard> {
    let needle = criteria.trim().to_lowercase();
    if needle.is_empty() {
        return cards.iter().collect();
    }
    cards
        .iter()
        .filter(|card| card.searchable_text().contains(&needle))
        .collect()
}
