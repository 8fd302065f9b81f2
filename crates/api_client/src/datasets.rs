//! The data each dashboard needs, fetched in one go.
//!
//! Each bundle is loaded sequentially; the first failing endpoint aborts the
//! rest and its error is returned as-is.

use async_trait::async_trait;
use kpi_engine::models::*;
use serde::Serialize;

use crate::client::ApiClient;
use crate::endpoints::Endpoint;
use crate::error::Result;

#[derive(Debug, Clone, Serialize)]
pub struct FinancialData {
    pub summary: FinancialSummary,
    pub cash_flow: CashFlow,
}

#[derive(Debug, Clone, Serialize)]
pub struct AccountsData {
    pub accounts: AccountsSummary,
    /// Detail payloads are passed through untouched.
    pub receivable: serde_json::Value,
    pub payable: serde_json::Value,
}

#[derive(Debug, Clone, Serialize)]
pub struct SalesData {
    pub sales: SalesSummary,
    pub by_period: SalesByPeriod,
    pub by_customer: SalesByCustomer,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExpensesData {
    pub summary: ExpensesSummary,
    pub by_period: ExpensesByPeriod,
    pub by_supplier: ExpensesBySupplier,
}

/// Source of dashboard data. Implemented by [`ApiClient`]; tests plug in fakes.
#[async_trait]
pub trait KpiSource: Send + Sync {
    /// Base URL shown in user-facing errors.
    fn base_url(&self) -> String;

    async fn financial(&self) -> Result<FinancialData>;
    async fn accounts(&self) -> Result<AccountsData>;
    async fn sales(&self) -> Result<SalesData>;
    async fn expenses(&self) -> Result<ExpensesData>;
    /// Asks the ML service to retrain; the response body is informational.
    async fn train_sales_forecast(&self) -> Result<serde_json::Value>;
    async fn sales_forecast(&self) -> Result<ForecastResult>;
}

#[async_trait]
impl KpiSource for ApiClient {
    fn base_url(&self) -> String {
        ApiClient::base_url(self).to_string()
    }

    async fn financial(&self) -> Result<FinancialData> {
        let summary = self.fetch(Endpoint::FinancialSummary).await?;
        let cash_flow = self.fetch(Endpoint::CashFlow).await?;
        Ok(FinancialData { summary, cash_flow })
    }

    async fn accounts(&self) -> Result<AccountsData> {
        let accounts = self.fetch(Endpoint::Accounts).await?;
        let receivable = self.fetch(Endpoint::AccountsReceivable).await?;
        let payable = self.fetch(Endpoint::AccountsPayable).await?;
        Ok(AccountsData {
            accounts,
            receivable,
            payable,
        })
    }

    async fn sales(&self) -> Result<SalesData> {
        let sales = self.fetch(Endpoint::Sales).await?;
        let by_period = self.fetch(Endpoint::SalesByPeriod).await?;
        let by_customer = self.fetch(Endpoint::SalesByCustomer).await?;
        Ok(SalesData {
            sales,
            by_period,
            by_customer,
        })
    }

    async fn expenses(&self) -> Result<ExpensesData> {
        let summary = self.fetch(Endpoint::Expenses).await?;
        let by_period = self.fetch(Endpoint::ExpensesByPeriod).await?;
        let by_supplier = self.fetch(Endpoint::ExpensesBySupplier).await?;
        Ok(ExpensesData {
            summary,
            by_period,
            by_supplier,
        })
    }

    async fn train_sales_forecast(&self) -> Result<serde_json::Value> {
        self.fetch(Endpoint::TrainSalesForecast).await
    }

    async fn sales_forecast(&self) -> Result<ForecastResult> {
        self.fetch(Endpoint::SalesForecast).await
    }
}
