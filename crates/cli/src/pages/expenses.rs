use api_client::ExpensesData;
use charts::{ChartKind, ChartSpec, Rgb, Series};
use kpi_engine::derive::top_by;
use kpi_engine::models::Counterparty;
use kpi_engine::{
    format_currency, format_periods, ExpensesKpis, KpiCard, Locale, Tone, ValueKind,
    NOT_AVAILABLE,
};
use report::Table;

use super::{period_span, Dashboard, PageView};

const CATEGORY: &str = "expenses";
pub const TOP_SUPPLIERS: usize = 10;

fn suppliers(data: &ExpensesData) -> &[Counterparty] {
    if data.by_supplier.top_suppliers.is_empty() {
        &data.summary.top_suppliers
    } else {
        &data.by_supplier.top_suppliers
    }
}

pub fn cards(data: &ExpensesData) -> Vec<KpiCard> {
    let kpis = ExpensesKpis::derive(&data.summary, &data.by_period, &data.by_supplier);
    let top_supplier = match &kpis.top_supplier {
        Some(s) => KpiCard::text(
            "Top Supplier",
            &s.id_label(),
            CATEGORY,
            &format!("Largest supplier by expenses: {}.", format_currency(s.debit())),
        ),
        None => KpiCard::text("Top Supplier", NOT_AVAILABLE, CATEGORY, "No supplier data."),
    };
    vec![
        KpiCard::signed(
            "Total Expenses",
            kpis.total_expenses,
            ValueKind::Currency,
            CATEGORY,
            "Operating expenses over every period.",
        ),
        KpiCard::signed(
            "Latest Period Expenses",
            kpis.latest_expenses,
            ValueKind::Currency,
            CATEGORY,
            "Expenses in the most recent period.",
        ),
        top_supplier,
        KpiCard::new(
            "Supplier Concentration",
            kpis.supplier_concentration,
            ValueKind::Percent,
            CATEGORY,
            "Share of expenses held by the three largest suppliers.",
            Tone::Amber,
        ),
        KpiCard::new(
            "Expense Volatility",
            kpis.expense_volatility,
            ValueKind::Percent,
            CATEGORY,
            "Standard deviation of period expenses relative to their mean.",
            Tone::Neutral,
        ),
        KpiCard::signed(
            "Expense Forecast",
            kpis.expense_forecast,
            ValueKind::Currency,
            CATEGORY,
            "Next period estimate from the average of the last three changes.",
        ),
    ]
}

pub fn charts(data: &ExpensesData, locale: Locale) -> Vec<ChartSpec> {
    let bp = &data.by_period;
    let by_period = ChartSpec::new(
        "Expenses by Period",
        ChartKind::Bar,
        format_periods(&bp.periods, locale),
    )
    .axes("Period", "Expenses")
    .with_series(Series::new("Expenses", bp.expenses.clone(), Rgb::RED));

    let top = top_by(suppliers(data), Counterparty::debit, TOP_SUPPLIERS);
    let ranking = ChartSpec::new(
        "Top Suppliers",
        ChartKind::Bar,
        top.iter().map(|s| s.id_label()).collect(),
    )
    .axes("Supplier", "Expenses")
    .with_series(Series::new(
        "Expenses",
        top.iter().map(|s| s.debit()).collect(),
        Rgb::PURPLE,
    ));

    vec![by_period, ranking]
}

fn suppliers_table(data: &ExpensesData) -> Table {
    top_by(suppliers(data), Counterparty::debit, TOP_SUPPLIERS)
        .into_iter()
        .fold(Table::new(&["Supplier", "Expenses"]), |table, s| {
            table.row(vec![s.id_label(), format_currency(s.debit())])
        })
}

pub fn view(data: &ExpensesData, locale: Locale) -> PageView {
    PageView {
        dashboard: Dashboard::Expenses,
        summary: format!(
            "Operational expenses over {}.",
            period_span(&data.by_period.periods, locale)
        ),
        cards: cards(data),
        kpis_from: None,
        charts: charts(data, locale),
        tables: vec![("Top Suppliers".to_string(), suppliers_table(data))],
    }
}
