use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Amounts keyed by period (`"YYYY-MM"`).
pub type PeriodMap = BTreeMap<String, f64>;

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct CashFlowSummary {
    #[serde(default)]
    pub operating: f64,
    #[serde(default)]
    pub investment: f64,
    #[serde(default)]
    pub financing: f64,
}

/// Response of `/api/kpis/financial/summary`.
///
/// Expenses arrive signed negative, so `net_profit == total_sales + total_expenses`
/// in the sample data. Nothing here enforces it.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct FinancialSummary {
    #[serde(default)]
    pub periods: Vec<String>,
    pub total_sales: f64,
    pub total_expenses: f64,
    pub net_profit: f64,
    pub profit_margin: f64,
    pub accounts_receivable: f64,
    pub accounts_payable: f64,
    #[serde(default)]
    pub cash_flow_summary: CashFlowSummary,
}

/// Response of `/api/kpis/financial/cash-flow`.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct CashFlow {
    #[serde(default)]
    pub periods: Vec<String>,
    #[serde(default)]
    pub operating_cash_flow: PeriodMap,
    #[serde(default)]
    pub financing_cash_flow: PeriodMap,
    #[serde(default)]
    pub investment_cash_flow: PeriodMap,
    #[serde(default)]
    pub accumulated_cash_flow: PeriodMap,
    #[serde(default)]
    pub total_cash_flow: PeriodMap,
}

/// A customer or supplier as ranked by the API.
///
/// Customers carry `credit_movement`, suppliers `debit_movement`.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Counterparty {
    pub third_party_id: serde_json::Value,
    #[serde(default)]
    pub third_party_type_id: Option<serde_json::Value>,
    #[serde(default)]
    pub debit_movement: Option<f64>,
    #[serde(default)]
    pub credit_movement: Option<f64>,
}

impl Counterparty {
    /// Identifier as display text; the API sends either numbers or strings.
    pub fn id_label(&self) -> String {
        match &self.third_party_id {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }

    pub fn debit(&self) -> f64 {
        self.debit_movement.unwrap_or(0.0)
    }

    pub fn credit(&self) -> f64 {
        self.credit_movement.unwrap_or(0.0)
    }
}

/// Response of `/api/kpis/accounts`.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct AccountsSummary {
    #[serde(default)]
    pub periods: Vec<String>,
    #[serde(default)]
    pub accounts_receivable: PeriodMap,
    #[serde(default)]
    pub accounts_payable: PeriodMap,
    #[serde(default)]
    pub avg_accounts_receivable: f64,
    #[serde(default)]
    pub avg_accounts_payable: f64,
    #[serde(default)]
    pub receivables_turnover: f64,
    #[serde(default)]
    pub payables_turnover: f64,
}

/// Response of `/api/kpis/sales`.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct SalesSummary {
    #[serde(default)]
    pub periods: Vec<String>,
    #[serde(default)]
    pub total_sales: PeriodMap,
    #[serde(default)]
    pub sales_growth: PeriodMap,
    #[serde(default)]
    pub total_sales_amount: f64,
    #[serde(default)]
    pub top_customers: Vec<Counterparty>,
}

/// Response of `/api/kpis/sales/by-period`; `sales` and `growth` align with `periods`.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct SalesByPeriod {
    #[serde(default)]
    pub periods: Vec<String>,
    #[serde(default)]
    pub sales: Vec<f64>,
    #[serde(default)]
    pub growth: Vec<f64>,
}

/// Response of `/api/kpis/sales/by-customer`.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct SalesByCustomer {
    #[serde(default)]
    pub top_customers: Vec<Counterparty>,
}

/// Response of `/api/kpis/expenses/`.
///
/// Expense amounts may be signed negative like in the financial summary.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ExpensesSummary {
    #[serde(default)]
    pub periods: Vec<String>,
    #[serde(default)]
    pub total_expenses: PeriodMap,
    #[serde(default)]
    pub total_expenses_amount: f64,
    #[serde(default)]
    pub top_suppliers: Vec<Counterparty>,
}

/// Response of `/api/kpis/expenses/by-period`.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ExpensesByPeriod {
    #[serde(default)]
    pub periods: Vec<String>,
    #[serde(default)]
    pub expenses: Vec<f64>,
}

/// Response of `/api/kpis/expenses/by-supplier`.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ExpensesBySupplier {
    #[serde(default)]
    pub top_suppliers: Vec<Counterparty>,
}

/// Output of the external sales forecasting service.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ForecastResult {
    #[serde(default)]
    pub historical_periods: Vec<String>,
    #[serde(default)]
    pub historical_values: Vec<f64>,
    #[serde(default)]
    pub forecast_periods: Vec<String>,
    #[serde(default)]
    pub forecast_values: Vec<f64>,
}

/// Values of `map` in the order given by `periods`; missing periods read as 0.
pub fn series_for(periods: &[String], map: &PeriodMap) -> Vec<f64> {
    periods
        .iter()
        .map(|p| map.get(p).copied().unwrap_or(0.0))
        .collect()
}

/// Value for the last listed period, if both exist.
pub fn latest_value(periods: &[String], map: &PeriodMap) -> Option<f64> {
    periods.last().and_then(|p| map.get(p).copied())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_sample_financial_summary() {
        let raw = json!({
            "periods": ["2024-01", "2024-02", "2024-03", "2024-04", "2024-05"],
            "total_sales": 2513313541.16,
            "total_expenses": -2841960946116.74,
            "net_profit": -2839447632575.58,
            "profit_margin": -112976.77,
            "accounts_receivable": 1200.0,
            "accounts_payable": -800.0,
            "cash_flow_summary": {"operating": 10.0, "investment": -4.0, "financing": 2.5}
        });
        let summary: FinancialSummary = serde_json::from_value(raw).unwrap();
        assert_eq!(summary.periods.len(), 5);
        assert_eq!(summary.cash_flow_summary.investment, -4.0);
        assert!((summary.total_sales + summary.total_expenses - summary.net_profit).abs() < 1e-3);
    }

    #[test]
    fn counterparty_accepts_numeric_or_string_ids() {
        let numeric: Counterparty =
            serde_json::from_value(json!({"third_party_id": 42, "credit_movement": 9.5})).unwrap();
        let text: Counterparty =
            serde_json::from_value(json!({"third_party_id": "C-7", "debit_movement": 3.0}))
                .unwrap();
        assert_eq!(numeric.id_label(), "42");
        assert_eq!(numeric.credit(), 9.5);
        assert_eq!(numeric.debit(), 0.0);
        assert_eq!(text.id_label(), "C-7");
        assert_eq!(text.debit(), 3.0);
    }

    #[test]
    fn series_follow_period_order() {
        let periods = vec!["2024-02".to_string(), "2024-01".to_string(), "2024-03".to_string()];
        let mut map = PeriodMap::new();
        map.insert("2024-01".into(), 1.0);
        map.insert("2024-02".into(), 2.0);
        assert_eq!(series_for(&periods, &map), vec![2.0, 1.0, 0.0]);
        assert_eq!(latest_value(&periods, &map), None);
        assert_eq!(latest_value(&periods[..2], &map), Some(1.0));
    }
}
