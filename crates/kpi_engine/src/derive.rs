//! Secondary KPIs computed from fetched primary values.
//!
//! Every function is pure. Zero denominators, empty series and non-finite
//! results come back as [`Metric::Unavailable`].

use serde::Serialize;
use std::cmp::Ordering;

use crate::metric::Metric;
use crate::models::*;
use crate::stats;

/// Number of suppliers counted by [`supplier_concentration`].
pub const CONCENTRATION_TOP_N: usize = 3;
/// Trailing deltas averaged by [`expense_forecast`].
pub const FORECAST_WINDOW: usize = 3;

/// `net_profit / |total_expenses| * 100`.
pub fn roi(net_profit: f64, total_expenses: f64) -> Metric {
    Metric::percent(net_profit, total_expenses.abs())
}

/// `|accounts_receivable / accounts_payable|`.
pub fn current_ratio(accounts_receivable: f64, accounts_payable: f64) -> Metric {
    Metric::ratio(accounts_receivable, accounts_payable).map(f64::abs)
}

/// `|total_sales / |total_expenses|| * 100`.
pub fn operational_efficiency(total_sales: f64, total_expenses: f64) -> Metric {
    Metric::percent(total_sales, total_expenses.abs()).map(f64::abs)
}

/// Population standard deviation over `|mean|`, as a percentage.
pub fn volatility(values: &[f64]) -> Metric {
    match (stats::std_dev(values), stats::mean(values)) {
        (Some(sd), Some(avg)) => Metric::percent(sd, avg.abs()),
        _ => Metric::Unavailable,
    }
}

/// Volatility of every `total_cash_flow` entry.
pub fn cash_flow_volatility(cash_flow: &CashFlow) -> Metric {
    let values: Vec<f64> = cash_flow.total_cash_flow.values().copied().collect();
    volatility(&values)
}

/// `(current - previous) / |previous| * 100`.
pub fn growth_rate(previous: f64, current: f64) -> Metric {
    Metric::percent(current - previous, previous.abs())
}

/// Growth between the last two values of a series.
pub fn trailing_growth(values: &[f64]) -> Metric {
    match values {
        [.., previous, current] => growth_rate(*previous, *current),
        _ => Metric::Unavailable,
    }
}

/// Share of `|total_expenses|` held by the three largest suppliers by debit.
pub fn supplier_concentration(suppliers: &[Counterparty], total_expenses: f64) -> Metric {
    let top: f64 = top_by(suppliers, Counterparty::debit, CONCENTRATION_TOP_N)
        .iter()
        .map(|s| s.debit())
        .sum();
    Metric::percent(top, total_expenses.abs())
}

/// Last value plus the average of the last three period-over-period deltas.
///
/// Needs at least two points.
pub fn expense_forecast(values: &[f64]) -> Metric {
    let Some(last) = values.last() else {
        return Metric::Unavailable;
    };
    let deltas = stats::deltas(values);
    let window = &deltas[deltas.len().saturating_sub(FORECAST_WINDOW)..];
    match stats::mean(window) {
        Some(avg_delta) => Metric::from_f64(last + avg_delta),
        None => Metric::Unavailable,
    }
}

/// The `n` largest entries by `key`, descending. Ties keep their API order.
pub fn top_by<F>(items: &[Counterparty], key: F, n: usize) -> Vec<&Counterparty>
where
    F: Fn(&Counterparty) -> f64,
{
    let mut sorted: Vec<&Counterparty> = items.iter().collect();
    sorted.sort_by(|a, b| key(b).partial_cmp(&key(a)).unwrap_or(Ordering::Equal));
    sorted.truncate(n);
    sorted
}

#[derive(Debug, Clone, Serialize)]
pub struct FinancialKpis {
    pub roi: Metric,
    pub current_ratio: Metric,
    pub operational_efficiency: Metric,
    pub cash_flow_volatility: Metric,
    pub growth_rate: Metric,
}

impl FinancialKpis {
    pub fn derive(summary: &FinancialSummary, cash_flow: &CashFlow) -> Self {
        let totals = series_for(&cash_flow.periods, &cash_flow.total_cash_flow);
        Self {
            roi: roi(summary.net_profit, summary.total_expenses),
            current_ratio: current_ratio(summary.accounts_receivable, summary.accounts_payable),
            operational_efficiency: operational_efficiency(
                summary.total_sales,
                summary.total_expenses,
            ),
            cash_flow_volatility: cash_flow_volatility(cash_flow),
            growth_rate: trailing_growth(&totals),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AccountsKpis {
    pub latest_receivable: Metric,
    pub latest_payable: Metric,
    pub net_position: Metric,
    pub receivable_payable_ratio: Metric,
}

impl AccountsKpis {
    pub fn derive(accounts: &AccountsSummary) -> Self {
        let receivable = latest_value(&accounts.periods, &accounts.accounts_receivable);
        let payable = latest_value(&accounts.periods, &accounts.accounts_payable);
        let net_position = match (receivable, payable) {
            (Some(r), Some(p)) => Metric::from_f64(r - p),
            _ => Metric::Unavailable,
        };
        Self {
            latest_receivable: receivable.into(),
            latest_payable: payable.into(),
            net_position,
            receivable_payable_ratio: current_ratio(
                accounts.avg_accounts_receivable,
                accounts.avg_accounts_payable,
            ),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SalesKpis {
    pub latest_sales: Metric,
    pub latest_growth: Metric,
    pub average_sales_per_period: Metric,
    pub sales_growth_rate: Metric,
    pub top_customer: Option<Counterparty>,
}

impl SalesKpis {
    pub fn derive(sales: &SalesSummary, by_period: &SalesByPeriod) -> Self {
        let top_customer = top_by(&sales.top_customers, Counterparty::credit, 1)
            .first()
            .map(|c| (*c).clone());
        Self {
            latest_sales: latest_value(&sales.periods, &sales.total_sales).into(),
            latest_growth: latest_value(&sales.periods, &sales.sales_growth).into(),
            average_sales_per_period: Metric::ratio(
                sales.total_sales_amount,
                sales.periods.len() as f64,
            ),
            sales_growth_rate: trailing_growth(&by_period.sales),
            top_customer,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ExpensesKpis {
    pub total_expenses: Metric,
    pub latest_expenses: Metric,
    pub supplier_concentration: Metric,
    pub expense_volatility: Metric,
    pub expense_forecast: Metric,
    pub top_supplier: Option<Counterparty>,
}

impl ExpensesKpis {
    pub fn derive(
        summary: &ExpensesSummary,
        by_period: &ExpensesByPeriod,
        by_supplier: &ExpensesBySupplier,
    ) -> Self {
        // The dedicated supplier ranking wins over the summary's embedded list.
        let suppliers = if by_supplier.top_suppliers.is_empty() {
            &summary.top_suppliers
        } else {
            &by_supplier.top_suppliers
        };
        let top_supplier = top_by(suppliers, Counterparty::debit, 1)
            .first()
            .map(|s| (*s).clone());
        Self {
            total_expenses: Metric::from_f64(summary.total_expenses_amount),
            latest_expenses: by_period.expenses.last().copied().into(),
            supplier_concentration: supplier_concentration(
                suppliers,
                summary.total_expenses_amount,
            ),
            expense_volatility: volatility(&by_period.expenses),
            expense_forecast: expense_forecast(&by_period.expenses),
            top_supplier,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ForecastKpis {
    pub projected_growth: Metric,
    pub average_forecast: Metric,
}

impl ForecastKpis {
    pub fn derive(forecast: &ForecastResult) -> Self {
        let projected_growth = match (
            forecast.historical_values.last(),
            forecast.forecast_values.first(),
        ) {
            (Some(last), Some(first)) => growth_rate(*last, *first),
            _ => Metric::Unavailable,
        };
        Self {
            projected_growth,
            average_forecast: stats::mean(&forecast.forecast_values).into(),
        }
    }
}
