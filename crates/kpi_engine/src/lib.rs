pub mod cards;
pub mod derive;
pub mod format;
pub mod metric;
pub mod models;
pub mod period;
pub mod stats;

// Re-export commonly used items
pub use crate::cards::{filter_cards, KpiCard, ValueKind};
pub use crate::derive::{
    AccountsKpis, ExpensesKpis, FinancialKpis, ForecastKpis, SalesKpis,
};
pub use crate::format::{
    format_currency, format_number, format_percent, trend, value_color, Tone, Trend,
    NOT_AVAILABLE,
};
pub use crate::metric::Metric;
pub use crate::period::{format_period, format_periods, Locale};
