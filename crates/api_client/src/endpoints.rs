use reqwest::Method;
use std::fmt;

/// Every REST resource the dashboards read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    FinancialSummary,
    CashFlow,
    Accounts,
    AccountsReceivable,
    AccountsPayable,
    Sales,
    SalesByPeriod,
    SalesByCustomer,
    Expenses,
    ExpensesByPeriod,
    ExpensesBySupplier,
    SalesForecast,
    TrainSalesForecast,
}

impl Endpoint {
    pub const ALL: [Endpoint; 13] = [
        Endpoint::FinancialSummary,
        Endpoint::CashFlow,
        Endpoint::Accounts,
        Endpoint::AccountsReceivable,
        Endpoint::AccountsPayable,
        Endpoint::Sales,
        Endpoint::SalesByPeriod,
        Endpoint::SalesByCustomer,
        Endpoint::Expenses,
        Endpoint::ExpensesByPeriod,
        Endpoint::ExpensesBySupplier,
        Endpoint::SalesForecast,
        Endpoint::TrainSalesForecast,
    ];

    /// Path relative to the base URL (no leading slash).
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::FinancialSummary => "api/kpis/financial/summary",
            Endpoint::CashFlow => "api/kpis/financial/cash-flow",
            Endpoint::Accounts => "api/kpis/accounts",
            Endpoint::AccountsReceivable => "api/kpis/accounts/receivable",
            Endpoint::AccountsPayable => "api/kpis/accounts/payable",
            Endpoint::Sales => "api/kpis/sales",
            Endpoint::SalesByPeriod => "api/kpis/sales/by-period",
            Endpoint::SalesByCustomer => "api/kpis/sales/by-customer",
            Endpoint::Expenses => "api/kpis/expenses/",
            Endpoint::ExpensesByPeriod => "api/kpis/expenses/by-period",
            Endpoint::ExpensesBySupplier => "api/kpis/expenses/by-supplier",
            Endpoint::SalesForecast => "api/ml/sales-forecast",
            Endpoint::TrainSalesForecast => "api/ml/train/sales-forecast",
        }
    }

    pub fn method(self) -> Method {
        match self {
            Endpoint::TrainSalesForecast => Method::POST,
            _ => Method::GET,
        }
    }

    /// What the endpoint returns, for error messages.
    pub fn description(self) -> &'static str {
        match self {
            Endpoint::FinancialSummary => "financial summary",
            Endpoint::CashFlow => "cash flow data",
            Endpoint::Accounts => "accounts data",
            Endpoint::AccountsReceivable => "accounts receivable data",
            Endpoint::AccountsPayable => "accounts payable data",
            Endpoint::Sales => "sales data",
            Endpoint::SalesByPeriod => "sales by period data",
            Endpoint::SalesByCustomer => "sales by customer data",
            Endpoint::Expenses => "expenses data",
            Endpoint::ExpensesByPeriod => "expenses by period data",
            Endpoint::ExpensesBySupplier => "expenses by supplier data",
            Endpoint::SalesForecast => "sales forecast",
            Endpoint::TrainSalesForecast => "sales forecast training",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} /{}", self.method(), self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_training_is_a_post() {
        let posts: Vec<_> = Endpoint::ALL
            .iter()
            .filter(|e| e.method() == Method::POST)
            .collect();
        assert_eq!(posts, vec![&Endpoint::TrainSalesForecast]);
    }

    #[test]
    fn paths_are_relative_and_unique() {
        let mut paths: Vec<_> = Endpoint::ALL.iter().map(|e| e.path()).collect();
        assert!(paths.iter().all(|p| p.starts_with("api/")));
        paths.sort();
        paths.dedup();
        assert_eq!(paths.len(), Endpoint::ALL.len());
    }

    #[test]
    fn displays_method_and_path() {
        assert_eq!(Endpoint::Expenses.to_string(), "GET /api/kpis/expenses/");
        assert_eq!(
            Endpoint::TrainSalesForecast.to_string(),
            "POST /api/ml/train/sales-forecast"
        );
    }
}
