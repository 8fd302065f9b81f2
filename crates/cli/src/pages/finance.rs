use api_client::FinancialData;
use charts::{ChartKind, ChartSpec, Rgb, Series};
use kpi_engine::models::series_for;
use kpi_engine::{format_periods, FinancialKpis, KpiCard, Locale, Metric, Tone, Trend, ValueKind};

use super::{period_span, Dashboard, PageView};

const CATEGORY: &str = "finance";
/// Cards read straight from the summary; the rest are derived KPIs.
const SUMMARY_CARDS: usize = 6;

pub fn cards(data: &FinancialData) -> Vec<KpiCard> {
    let s = &data.summary;
    let kpis = FinancialKpis::derive(s, &data.cash_flow);
    let with_sign = |card: KpiCard, m: Metric| card.with_trend(Trend::of(m.unwrap_or(0.0)));

    vec![
        KpiCard::signed(
            "Total Sales",
            Metric::from_f64(s.total_sales),
            ValueKind::Currency,
            CATEGORY,
            "Total revenue for the selected periods.",
        ),
        KpiCard::signed(
            "Total Expenses",
            Metric::from_f64(s.total_expenses),
            ValueKind::Currency,
            CATEGORY,
            "Total operating expenses for the selected periods.",
        ),
        KpiCard::signed(
            "Net Profit",
            Metric::from_f64(s.net_profit),
            ValueKind::Currency,
            CATEGORY,
            "Total Sales minus Total Expenses.",
        ),
        KpiCard::new(
            "Profit Margin",
            Metric::from_f64(s.profit_margin),
            ValueKind::Percent,
            CATEGORY,
            "Net Profit as a percentage of Total Sales.",
            Tone::Purple,
        ),
        KpiCard::signed(
            "Accounts Receivable",
            Metric::from_f64(s.accounts_receivable),
            ValueKind::Currency,
            CATEGORY,
            "Amounts owed by customers.",
        ),
        KpiCard::signed(
            "Accounts Payable",
            Metric::from_f64(s.accounts_payable),
            ValueKind::Currency,
            CATEGORY,
            "Amounts owed to suppliers.",
        ),
        with_sign(
            KpiCard::new(
                "ROI",
                kpis.roi,
                ValueKind::Percent,
                CATEGORY,
                "Return on Investment: Net Profit over Total Expenses.",
                Tone::Indigo,
            ),
            kpis.roi,
        ),
        KpiCard::new(
            "Current Ratio",
            kpis.current_ratio,
            ValueKind::Plain,
            CATEGORY,
            "Accounts Receivable over Accounts Payable.",
            Tone::Teal,
        ),
        KpiCard::new(
            "Operational Efficiency",
            kpis.operational_efficiency,
            ValueKind::Percent,
            CATEGORY,
            "Total Sales over Total Expenses.",
            Tone::Amber,
        ),
        KpiCard::new(
            "Cash Flow Volatility",
            kpis.cash_flow_volatility,
            ValueKind::Percent,
            CATEGORY,
            "Standard deviation of total cash flow relative to its mean.",
            Tone::Neutral,
        ),
        KpiCard::signed(
            "Growth Rate",
            kpis.growth_rate,
            ValueKind::Percent,
            CATEGORY,
            "Change in total cash flow over the last two periods.",
        ),
    ]
}

pub fn charts(data: &FinancialData, locale: Locale) -> Vec<ChartSpec> {
    let cf = &data.cash_flow;
    let labels = format_periods(&cf.periods, locale);
    let summary = &data.summary;

    let flows = ChartSpec::new("Cash Flow Analysis", ChartKind::Line, labels.clone())
        .axes("Period", "Amount")
        .with_series(Series::new(
            "Operating",
            series_for(&cf.periods, &cf.operating_cash_flow),
            Rgb::TEAL,
        ))
        .with_series(Series::new(
            "Financing",
            series_for(&cf.periods, &cf.financing_cash_flow),
            Rgb::RED,
        ))
        .with_series(Series::new(
            "Total",
            series_for(&cf.periods, &cf.total_cash_flow),
            Rgb::BLUE,
        ));

    let accumulated = ChartSpec::new("Accumulated Cash Flow", ChartKind::Area, labels.clone())
        .axes("Period", "Amount")
        .with_series(Series::new(
            "Accumulated",
            series_for(&cf.periods, &cf.accumulated_cash_flow),
            Rgb::BLUE,
        ));

    let mix = &summary.cash_flow_summary;
    let composition = ChartSpec::new(
        "Cash Flow Composition",
        ChartKind::Pie { hole: 0.5 },
        vec!["Operating".into(), "Investment".into(), "Financing".into()],
    )
    .with_series(Series::new(
        "Composition",
        vec![mix.operating.abs(), mix.investment.abs(), mix.financing.abs()],
        Rgb::TEAL,
    ))
    .with_palette(vec![Rgb::TEAL, Rgb::YELLOW, Rgb::RED]);

    let margin_periods = if summary.periods.is_empty() {
        &cf.periods
    } else {
        &summary.periods
    };
    let profitability = ChartSpec::new(
        "Profitability Analysis",
        ChartKind::Bar,
        format_periods(margin_periods, locale),
    )
    .axes("Period", "Profit Margin (%)")
    .with_series(Series::new(
        "Profit Margin",
        spread(summary.profit_margin, margin_periods.len()),
        Rgb::PURPLE,
    ));

    vec![flows, accumulated, composition, profitability]
}

/// `total` split evenly over `n` bars.
fn spread(total: f64, n: usize) -> Vec<f64> {
    if n == 0 {
        return Vec::new();
    }
    vec![total / n as f64; n]
}

pub fn view(data: &FinancialData, locale: Locale) -> PageView {
    let cards = cards(data);
    PageView {
        dashboard: Dashboard::Finance,
        summary: format!(
            "Financial position and cash flow over {}.",
            period_span(&data.cash_flow.periods, locale)
        ),
        kpis_from: Some(SUMMARY_CARDS),
        charts: charts(data, locale),
        tables: Vec::new(),
        cards,
    }
}
