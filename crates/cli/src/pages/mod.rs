//! One module per dashboard: fetched data in, cards, charts and tables out.

pub mod accounts;
pub mod expenses;
pub mod finance;
pub mod forecast;
pub mod sales;

use api_client::KpiSource;
use charts::{ChartRenderer, ChartSpec};
use chrono::{DateTime, Local};
use kpi_engine::{format_period, KpiCard, Locale};
use report::{Report, ReportType, Table};
use serde::Serialize;
use tracing::{debug, info};

/// Charts placed on each "Graphical Analysis" page of a report.
pub const CHARTS_PER_PAGE: usize = 2;
pub const KPI_SECTION: &str = "Key Performance Indicators (KPIs)";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Dashboard {
    Finance,
    Accounts,
    Sales,
    Expenses,
    Forecast,
}

impl Dashboard {
    pub const ALL: [Dashboard; 5] = [
        Dashboard::Finance,
        Dashboard::Accounts,
        Dashboard::Sales,
        Dashboard::Expenses,
        Dashboard::Forecast,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Dashboard::Finance => "Financial Dashboard",
            Dashboard::Accounts => "Administrative Accounts Dashboard",
            Dashboard::Sales => "Sales Dashboard",
            Dashboard::Expenses => "Operational Expenses Dashboard",
            Dashboard::Forecast => "Sales Forecast Dashboard",
        }
    }

    pub fn report_type(self) -> ReportType {
        match self {
            Dashboard::Finance => ReportType::Financial,
            Dashboard::Accounts => ReportType::AdministrativeAccounts,
            Dashboard::Sales => ReportType::Sales,
            Dashboard::Expenses => ReportType::OperationalExpenses,
            Dashboard::Forecast => ReportType::SalesForecast,
        }
    }

    fn summary_title(self) -> &'static str {
        match self {
            Dashboard::Finance => "Financial Summary",
            Dashboard::Accounts => "Accounts Summary",
            Dashboard::Sales => "Sales Summary",
            Dashboard::Expenses => "Expenses Summary",
            Dashboard::Forecast => "Forecast Summary",
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LoadOptions {
    pub locale: Locale,
    /// Reuse the last trained forecast instead of retraining first.
    pub skip_training: bool,
}

/// Everything one dashboard shows, ready to print or export.
#[derive(Debug, Clone, Serialize)]
pub struct PageView {
    pub dashboard: Dashboard,
    pub summary: String,
    pub cards: Vec<KpiCard>,
    /// Index of the first derived KPI card, printed under its own heading.
    #[serde(skip)]
    pub kpis_from: Option<usize>,
    #[serde(skip)]
    pub charts: Vec<ChartSpec>,
    #[serde(skip)]
    pub tables: Vec<(String, Table)>,
}

impl PageView {
    /// Summary and cards on page one, then charts two per page, then tables.
    pub fn to_report(&self, renderer: &dyn ChartRenderer, generated_at: DateTime<Local>) -> Report {
        let mut report = Report::new(self.dashboard.report_type(), generated_at);
        report
            .section(self.dashboard.summary_title())
            .paragraph(&self.summary);
        match self.kpis_from {
            Some(split) if split < self.cards.len() => {
                report
                    .cards(&self.cards[..split])
                    .section(KPI_SECTION)
                    .cards(&self.cards[split..]);
            }
            _ => {
                report.cards(&self.cards);
            }
        }

        for (i, chunk) in self.charts.chunks(CHARTS_PER_PAGE).enumerate() {
            report.page_break().section(if i == 0 {
                "Graphical Analysis"
            } else {
                "Graphical Analysis - Continuation"
            });
            for spec in chunk {
                report.chart(renderer, spec);
            }
        }

        for (title, table) in &self.tables {
            report.section(title).table(table.clone());
        }
        report
    }
}

/// Fetches one dashboard's data and turns it into a view.
pub async fn load(
    dashboard: Dashboard,
    source: &dyn KpiSource,
    options: LoadOptions,
) -> api_client::Result<PageView> {
    info!(dashboard = ?dashboard, "loading dashboard");
    let locale = options.locale;
    let view = match dashboard {
        Dashboard::Finance => finance::view(&source.financial().await?, locale),
        Dashboard::Accounts => accounts::view(&source.accounts().await?, locale),
        Dashboard::Sales => sales::view(&source.sales().await?, locale),
        Dashboard::Expenses => expenses::view(&source.expenses().await?, locale),
        Dashboard::Forecast => {
            if options.skip_training {
                debug!("skipping forecast training");
            } else {
                let status = source.train_sales_forecast().await?;
                debug!(%status, "forecast model retrained");
            }
            forecast::view(&source.sales_forecast().await?, locale)
        }
    };
    Ok(view)
}

/// `"3 periods, January 2024 to March 2024"`.
pub(crate) fn period_span(periods: &[String], locale: Locale) -> String {
    match (periods.first(), periods.last()) {
        (Some(first), Some(last)) if periods.len() > 1 => format!(
            "{} periods, {} to {}",
            periods.len(),
            format_period(first, locale),
            format_period(last, locale)
        ),
        (Some(only), _) => format!("1 period, {}", format_period(only, locale)),
        _ => "no periods".to_string(),
    }
}

/// Two-column table listing each card's title and value.
pub(crate) fn metrics_table(cards: &[KpiCard]) -> Table {
    cards.iter().fold(Table::new(&["Metric", "Value"]), |table, card| {
        table.row(vec![card.title.clone(), card.value.clone()])
    })
}


#[cfg(test)]
mod tests {
    use super::testing::{BlankRenderer, BrokenRenderer};
    use super::*;
    use charts::{ChartKind, Rgb, Series};
    use chrono::TimeZone;
    use kpi_engine::{Metric, ValueKind};
    use report::Block;

    fn view(charts: usize) -> PageView {
        let spec = ChartSpec::new("c", ChartKind::Line, vec!["2024-01".into()])
            .with_series(Series::new("s", vec![1.0], Rgb::BLUE));
        let card = KpiCard::signed("ROI", Metric::Value(5.0), ValueKind::Percent, "finance", "");
        PageView {
            dashboard: Dashboard::Finance,
            summary: "summary".into(),
            cards: vec![card.clone()],
            kpis_from: None,
            charts: vec![spec; charts],
            tables: vec![("Metrics".into(), metrics_table(&[card]))],
        }
    }

    fn sections(report: &Report) -> Vec<String> {
        report
            .blocks
            .iter()
            .filter_map(|b| match b {
                Block::Section(s) => Some(s.clone()),
                _ => None,
            })
            .collect()
    }

    fn at() -> DateTime<Local> {
        Local.with_ymd_and_hms(2025, 5, 20, 14, 3, 7).unwrap()
    }

    #[test]
    fn four_charts_take_two_analysis_pages() {
        let report = view(4).to_report(&BlankRenderer, at());
        assert_eq!(report.chart_count(), 4);
        assert_eq!(
            sections(&report),
            vec![
                "Financial Summary",
                "Graphical Analysis",
                "Graphical Analysis - Continuation",
                "Metrics",
            ]
        );
        assert_eq!(report.filename(), "Financial_Report_2025-05-20_14-03-07.pdf");
    }

    #[test]
    fn derived_cards_get_their_own_heading() {
        let mut page = view(0);
        let net = KpiCard::signed(
            "Net Profit",
            Metric::Value(1.0),
            ValueKind::Currency,
            "finance",
            "",
        );
        page.cards.insert(0, net);
        page.kpis_from = Some(1);

        let report = page.to_report(&BlankRenderer, at());
        assert_eq!(
            sections(&report),
            vec!["Financial Summary", KPI_SECTION, "Metrics"]
        );
        let card_blocks: Vec<usize> = report
            .blocks
            .iter()
            .filter_map(|b| match b {
                Block::Cards(cards) => Some(cards.len()),
                _ => None,
            })
            .collect();
        assert_eq!(card_blocks, vec![1, 1]);
    }

    #[test]
    fn split_past_the_end_keeps_one_grid() {
        let mut page = view(0);
        page.kpis_from = Some(5);
        let report = page.to_report(&BlankRenderer, at());
        assert!(!sections(&report).contains(&KPI_SECTION.to_string()));
    }

    #[test]
    fn broken_charts_do_not_stop_the_report() {
        let report = view(3).to_report(&BrokenRenderer, at());
        assert_eq!(report.chart_count(), 0);
        assert!(sections(&report).contains(&"Metrics".to_string()));
    }

    #[test]
    fn describes_period_spans() {
        let periods = vec!["2024-01".to_string(), "2024-03".to_string()];
        assert_eq!(
            period_span(&periods, Locale::En),
            "2 periods, January 2024 to March 2024"
        );
        assert_eq!(period_span(&periods[..1], Locale::Es), "1 period, Enero 2024");
        assert_eq!(period_span(&[], Locale::En), "no periods");
    }
}
