//! Plain-text and JSON rendering of KPI cards on stdout.

use std::io::{self, Write};

use kpi_engine::KpiCard;
use serde::Serialize;

use crate::pages::Dashboard;

#[derive(Debug, Serialize)]
pub struct CardGroup<'a> {
    pub dashboard: Dashboard,
    pub title: &'static str,
    pub cards: Vec<&'a KpiCard>,
}

impl<'a> CardGroup<'a> {
    pub fn new(dashboard: Dashboard, cards: Vec<&'a KpiCard>) -> Self {
        Self {
            dashboard,
            title: dashboard.title(),
            cards,
        }
    }
}

/// Title, value with trend arrow and description, one card per line.
pub fn write_text(out: &mut dyn Write, groups: &[CardGroup<'_>]) -> io::Result<()> {
    for group in groups {
        writeln!(out, "{}", group.title)?;
        writeln!(out, "{}", "=".repeat(group.title.chars().count()))?;
        if group.cards.is_empty() {
            writeln!(out, "  (no matching KPIs)")?;
        }
        let width = group
            .cards
            .iter()
            .map(|c| c.title.chars().count())
            .max()
            .unwrap_or(0);
        for card in &group.cards {
            writeln!(
                out,
                "  {:<width$}  {:>14}  {}",
                card.title,
                card.display_value(),
                card.description,
            )?;
        }
        writeln!(out)?;
    }
    Ok(())
}

pub fn write_json(out: &mut dyn Write, groups: &[CardGroup<'_>]) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, groups)?;
    writeln!(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kpi_engine::{Metric, ValueKind};

    fn card() -> KpiCard {
        KpiCard::signed(
            "Net Profit",
            Metric::Value(1_500_000.0),
            ValueKind::Currency,
            "finance",
            "Total Sales minus Total Expenses.",
        )
    }

    #[test]
    fn text_lists_cards_under_a_heading() {
        let c = card();
        let mut buf: Vec<u8> = Vec::new();
        write_text(&mut buf, &[CardGroup::new(Dashboard::Finance, vec![&c])]).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.starts_with("Financial Dashboard\n==================="));
        assert!(text.contains("$1.50M↑"));
        assert!(text.contains("Total Sales minus Total Expenses."));
    }

    #[test]
    fn empty_groups_say_so() {
        let mut buf: Vec<u8> = Vec::new();
        write_text(&mut buf, &[CardGroup::new(Dashboard::Sales, vec![])]).unwrap();
        assert!(String::from_utf8(buf).unwrap().contains("(no matching KPIs)"));
    }

    #[test]
    fn json_keeps_unavailable_as_null() {
        let c = KpiCard::signed("ROI", Metric::Unavailable, ValueKind::Percent, "finance", "");
        let mut buf: Vec<u8> = Vec::new();
        write_json(&mut buf, &[CardGroup::new(Dashboard::Finance, vec![&c])]).unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(parsed[0]["dashboard"], "finance");
        assert_eq!(parsed[0]["cards"][0]["value"], "N/A");
        assert!(parsed[0]["cards"][0]["raw"].is_null());
    }
}
