use api_client::AccountsData;
use charts::{ChartKind, ChartSpec, Rgb, Series};
use kpi_engine::models::series_for;
use kpi_engine::{format_periods, AccountsKpis, KpiCard, Locale, Metric, Tone, ValueKind};

use super::{metrics_table, period_span, Dashboard, PageView};

const CATEGORY: &str = "accounts";

pub fn cards(data: &AccountsData) -> Vec<KpiCard> {
    let a = &data.accounts;
    let kpis = AccountsKpis::derive(a);
    vec![
        KpiCard::signed(
            "Latest Receivables",
            kpis.latest_receivable,
            ValueKind::Currency,
            CATEGORY,
            "Accounts receivable in the most recent period.",
        ),
        KpiCard::signed(
            "Latest Payables",
            kpis.latest_payable,
            ValueKind::Currency,
            CATEGORY,
            "Accounts payable in the most recent period.",
        ),
        KpiCard::signed(
            "Net Position",
            kpis.net_position,
            ValueKind::Currency,
            CATEGORY,
            "Latest receivables minus latest payables.",
        ),
        KpiCard::signed(
            "Average Receivables",
            Metric::from_f64(a.avg_accounts_receivable),
            ValueKind::Currency,
            CATEGORY,
            "Average accounts receivable per period.",
        ),
        KpiCard::signed(
            "Average Payables",
            Metric::from_f64(a.avg_accounts_payable),
            ValueKind::Currency,
            CATEGORY,
            "Average accounts payable per period.",
        ),
        KpiCard::new(
            "Receivables Turnover",
            Metric::from_f64(a.receivables_turnover),
            ValueKind::Plain,
            CATEGORY,
            "How many times receivables are collected per year.",
            Tone::Indigo,
        ),
        KpiCard::new(
            "Payables Turnover",
            Metric::from_f64(a.payables_turnover),
            ValueKind::Plain,
            CATEGORY,
            "How many times payables are settled per year.",
            Tone::Purple,
        ),
        KpiCard::new(
            "Receivable/Payable Ratio",
            kpis.receivable_payable_ratio,
            ValueKind::Plain,
            CATEGORY,
            "Average receivables over average payables.",
            Tone::Teal,
        ),
    ]
}

pub fn charts(data: &AccountsData, locale: Locale) -> Vec<ChartSpec> {
    let a = &data.accounts;
    let labels = format_periods(&a.periods, locale);
    let receivable = series_for(&a.periods, &a.accounts_receivable);
    let payable = series_for(&a.periods, &a.accounts_payable);

    let comparison = ChartSpec::new("Receivable vs Payable", ChartKind::Line, labels.clone())
        .axes("Period", "Amount")
        .with_series(Series::new("Accounts Receivable", receivable.clone(), Rgb::TEAL))
        .with_series(Series::new("Accounts Payable", payable.clone(), Rgb::RED));

    let abs = |values: Vec<f64>| values.into_iter().map(f64::abs).collect::<Vec<_>>();
    let volume = ChartSpec::new("Accounts Volume", ChartKind::StackedArea, labels)
        .axes("Period", "Amount")
        .with_series(Series::new("Accounts Receivable", abs(receivable), Rgb::TEAL))
        .with_series(Series::new("Accounts Payable", abs(payable), Rgb::RED));

    vec![comparison, volume]
}

pub fn view(data: &AccountsData, locale: Locale) -> PageView {
    let cards = cards(data);
    PageView {
        dashboard: Dashboard::Accounts,
        summary: format!(
            "Receivables and payables over {}.",
            period_span(&data.accounts.periods, locale)
        ),
        kpis_from: None,
        charts: charts(data, locale),
        tables: vec![("Accounts Metrics Summary".to_string(), metrics_table(&cards))],
        cards,
    }
}
