pub mod client;
pub mod config;
pub mod datasets;
pub mod endpoints;
pub mod error;

pub use client::ApiClient;
pub use config::{ApiConfig, DEFAULT_BASE_URL};
pub use datasets::{AccountsData, ExpensesData, FinancialData, KpiSource, SalesData};
pub use endpoints::Endpoint;
pub use error::{ApiError, Result};
pub use tokio_util::sync::CancellationToken;
