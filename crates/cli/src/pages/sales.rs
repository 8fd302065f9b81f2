use api_client::SalesData;
use charts::{ChartKind, ChartSpec, Rgb, Series};
use kpi_engine::derive::top_by;
use kpi_engine::models::Counterparty;
use kpi_engine::{
    format_currency, format_periods, KpiCard, Locale, Metric, SalesKpis, ValueKind,
    NOT_AVAILABLE,
};
use report::Table;

use super::{period_span, Dashboard, PageView};

const CATEGORY: &str = "sales";
/// Customers shown in the ranking chart.
pub const TOP_CUSTOMERS: usize = 10;

/// The dedicated ranking endpoint wins; the summary list is a fallback.
fn customers(data: &SalesData) -> &[Counterparty] {
    if data.by_customer.top_customers.is_empty() {
        &data.sales.top_customers
    } else {
        &data.by_customer.top_customers
    }
}

fn customer_label(customer: &Counterparty) -> String {
    format!("Customer {}", customer.id_label())
}

pub fn cards(data: &SalesData) -> Vec<KpiCard> {
    let kpis = SalesKpis::derive(&data.sales, &data.by_period);
    let top_customer = match &kpis.top_customer {
        Some(c) => KpiCard::text(
            "Top Customer",
            &customer_label(c),
            CATEGORY,
            &format!("Largest customer by sales: {}.", format_currency(c.credit())),
        ),
        None => KpiCard::text("Top Customer", NOT_AVAILABLE, CATEGORY, "No customer data."),
    };
    vec![
        KpiCard::signed(
            "Total Sales",
            Metric::from_f64(data.sales.total_sales_amount),
            ValueKind::Currency,
            CATEGORY,
            "Total revenue generated from all sales activities.",
        ),
        KpiCard::signed(
            "Latest Period Sales",
            kpis.latest_sales,
            ValueKind::Currency,
            CATEGORY,
            "Sales in the most recent period.",
        ),
        KpiCard::signed(
            "Latest Growth",
            kpis.latest_growth,
            ValueKind::Percent,
            CATEGORY,
            "Sales growth reported for the most recent period.",
        ),
        top_customer,
        KpiCard::signed(
            "Average Sales per Period",
            kpis.average_sales_per_period,
            ValueKind::Currency,
            CATEGORY,
            "Total sales divided by the number of periods.",
        ),
        KpiCard::signed(
            "Sales Growth Rate",
            kpis.sales_growth_rate,
            ValueKind::Percent,
            CATEGORY,
            "Change in sales between the last two periods.",
        ),
    ]
}

pub fn charts(data: &SalesData, locale: Locale) -> Vec<ChartSpec> {
    let bp = &data.by_period;
    let labels = format_periods(&bp.periods, locale);

    let by_period = ChartSpec::new("Sales by Period", ChartKind::Bar, labels.clone())
        .axes("Period", "Sales")
        .with_series(Series::new("Sales", bp.sales.clone(), Rgb::BLUE));

    let growth = ChartSpec::new("Sales Growth", ChartKind::Line, labels)
        .axes("Period", "Growth (%)")
        .with_series(Series::new("Growth", bp.growth.clone(), Rgb::PURPLE));

    let top = top_by(customers(data), Counterparty::credit, TOP_CUSTOMERS);
    let ranking = ChartSpec::new(
        "Top 10 Customers by Sales",
        ChartKind::Bar,
        top.iter().map(|c| customer_label(c)).collect(),
    )
    .axes("Customer", "Sales")
    .with_series(Series::new(
        "Sales",
        top.iter().map(|c| c.credit()).collect(),
        Rgb::TEAL,
    ));

    vec![by_period, growth, ranking]
}

fn customers_table(data: &SalesData) -> Table {
    top_by(customers(data), Counterparty::credit, TOP_CUSTOMERS)
        .into_iter()
        .fold(Table::new(&["Customer", "Sales"]), |table, c| {
            table.row(vec![customer_label(c), format_currency(c.credit())])
        })
}

pub fn view(data: &SalesData, locale: Locale) -> PageView {
    PageView {
        dashboard: Dashboard::Sales,
        summary: format!(
            "Sales performance over {}.",
            period_span(&data.sales.periods, locale)
        ),
        cards: cards(data),
        kpis_from: None,
        charts: charts(data, locale),
        tables: vec![("Top Customers".to_string(), customers_table(data))],
    }
}
