//! One run of the tool: fetch, derive, print and optionally export.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use api_client::KpiSource;
use charts::ChartRenderer;
use chrono::Local;
use kpi_engine::{filter_cards, Locale};
use tracing::info;

use crate::output::{write_json, write_text, CardGroup};
use crate::pages::{self, Dashboard, LoadOptions, PageView};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// A single dashboard, exported as a report unless disabled.
    Page(Dashboard),
    /// Cards of every dashboard; never exports.
    Cards,
}

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub command: Command,
    pub locale: Locale,
    pub skip_training: bool,
    pub filter: Option<String>,
    pub export: bool,
    pub out_dir: PathBuf,
    pub json: bool,
}

#[derive(Debug, Default)]
pub struct RunSummary {
    pub cards_shown: usize,
    pub report: Option<PathBuf>,
}

fn print(out: &mut dyn Write, groups: &[CardGroup<'_>], json: bool) -> Result<()> {
    let written = if json {
        write_json(out, groups)
    } else {
        write_text(out, groups)
    };
    written.context("writing KPI cards")
}

pub async fn run(
    source: &dyn KpiSource,
    renderer: &dyn ChartRenderer,
    options: &RunOptions,
    out: &mut dyn Write,
) -> Result<RunSummary> {
    let criteria = options.filter.as_deref().unwrap_or("");
    match options.command {
        Command::Page(dashboard) => {
            let load = LoadOptions {
                locale: options.locale,
                skip_training: options.skip_training,
            };
            let view = pages::load(dashboard, source, load)
                .await
                .with_context(|| format!("loading {}", dashboard.title()))?;

            let shown = filter_cards(&view.cards, criteria);
            let cards_shown = shown.len();
            print(out, &[CardGroup::new(dashboard, shown)], options.json)?;

            let report = if options.export {
                Some(export(&view, renderer, options)?)
            } else {
                None
            };
            Ok(RunSummary {
                cards_shown,
                report,
            })
        }
        Command::Cards => {
            // Listing cards should not retrain the forecast model.
            let load = LoadOptions {
                locale: options.locale,
                skip_training: true,
            };
            let mut views: Vec<PageView> = Vec::with_capacity(Dashboard::ALL.len());
            for dashboard in Dashboard::ALL {
                let view = pages::load(dashboard, source, load)
                    .await
                    .with_context(|| format!("loading {}", dashboard.title()))?;
                views.push(view);
            }

            let groups: Vec<CardGroup<'_>> = views
                .iter()
                .map(|v| CardGroup::new(v.dashboard, filter_cards(&v.cards, criteria)))
                .filter(|g| !g.cards.is_empty() || criteria.trim().is_empty())
                .collect();
            let cards_shown = groups.iter().map(|g| g.cards.len()).sum();
            info!(cards_shown, filter = criteria, "cards listed");
            print(out, &groups, options.json)?;
            Ok(RunSummary {
                cards_shown,
                report: None,
            })
        }
    }
}

fn export(view: &PageView, renderer: &dyn ChartRenderer, options: &RunOptions) -> Result<PathBuf> {
    let report = view.to_report(renderer, Local::now());
    let path = report::export(&report, &options.out_dir)
        .with_context(|| format!("exporting {}", report.kind.title()))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pages::testing::BlankRenderer;
    use api_client::{
        AccountsData, ApiError, Endpoint, ExpensesData, FinancialData, SalesData,
    };
    use async_trait::async_trait;
    use kpi_engine::models::ForecastResult;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Serves fixed payloads; `fail_on` makes that endpoint return HTTP 500.
    #[derive(Default)]
    struct FakeSource {
        fail_on: Option<Endpoint>,
        trainings: AtomicUsize,
    }

    impl FakeSource {
        fn check(&self, endpoint: Endpoint) -> api_client::Result<()> {
            match self.fail_on {
                Some(e) if e == endpoint => Err(ApiError::Status {
                    endpoint,
                    status: 500,
                }),
                _ => Ok(()),
            }
        }
    }

    #[async_trait]
    impl KpiSource for FakeSource {
        fn base_url(&self) -> String {
            "http://erp.test/".to_string()
        }

        async fn financial(&self) -> api_client::Result<FinancialData> {
            self.check(Endpoint::FinancialSummary)?;
            Ok(FinancialData {
                summary: serde_json::from_value(json!({
                    "total_sales": 300.0,
                    "total_expenses": -100.0,
                    "net_profit": 200.0,
                    "profit_margin": 66.67,
                    "accounts_receivable": 50.0,
                    "accounts_payable": 25.0
                }))
                .unwrap(),
                cash_flow: serde_json::from_value(json!({
                    "periods": ["2024-01", "2024-02"],
                    "total_cash_flow": { "2024-01": 10.0, "2024-02": 20.0 }
                }))
                .unwrap(),
            })
        }

        async fn accounts(&self) -> api_client::Result<AccountsData> {
            self.check(Endpoint::Accounts)?;
            Ok(AccountsData {
                accounts: serde_json::from_value(json!({ "periods": ["2024-01"] })).unwrap(),
                receivable: json!({}),
                payable: json!({}),
            })
        }

        async fn sales(&self) -> api_client::Result<SalesData> {
            self.check(Endpoint::Sales)?;
            Ok(SalesData {
                sales: serde_json::from_value(json!({})).unwrap(),
                by_period: serde_json::from_value(json!({})).unwrap(),
                by_customer: serde_json::from_value(json!({})).unwrap(),
            })
        }

        async fn expenses(&self) -> api_client::Result<ExpensesData> {
            self.check(Endpoint::Expenses)?;
            Ok(ExpensesData {
                summary: serde_json::from_value(json!({})).unwrap(),
                by_period: serde_json::from_value(json!({})).unwrap(),
                by_supplier: serde_json::from_value(json!({})).unwrap(),
            })
        }

        async fn train_sales_forecast(&self) -> api_client::Result<serde_json::Value> {
            self.check(Endpoint::TrainSalesForecast)?;
            self.trainings.fetch_add(1, Ordering::SeqCst);
            Ok(json!({ "status": "trained" }))
        }

        async fn sales_forecast(&self) -> api_client::Result<ForecastResult> {
            self.check(Endpoint::SalesForecast)?;
            Ok(serde_json::from_value(json!({
                "historical_periods": ["2024-01"],
                "historical_values": [100.0],
                "forecast_periods": ["2024-02"],
                "forecast_values": [110.0]
            }))
            .unwrap())
        }
    }

    fn options(command: Command, out_dir: PathBuf) -> RunOptions {
        RunOptions {
            command,
            locale: Locale::En,
            skip_training: false,
            filter: None,
            export: false,
            out_dir,
            json: false,
        }
    }

    #[tokio::test]
    async fn page_run_prints_and_exports() {
        let dir = tempfile::tempdir().unwrap();
        let mut opts = options(Command::Page(Dashboard::Finance), dir.path().to_path_buf());
        opts.export = true;
        let mut out: Vec<u8> = Vec::new();

        let summary = run(&FakeSource::default(), &BlankRenderer, &opts, &mut out)
            .await
            .unwrap();

        assert_eq!(summary.cards_shown, 11);
        let path = summary.report.unwrap();
        assert!(path.exists());
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("Financial_Report_") && name.ends_with(".pdf"));
        assert!(String::from_utf8(out).unwrap().contains("Financial Dashboard"));
    }

    #[tokio::test]
    async fn failures_keep_the_api_error() {
        let dir = tempfile::tempdir().unwrap();
        let opts = options(Command::Page(Dashboard::Sales), dir.path().join("none"));
        let source = FakeSource {
            fail_on: Some(Endpoint::Sales),
            ..Default::default()
        };
        let err = run(&source, &BlankRenderer, &opts, &mut std::io::sink())
            .await
            .unwrap_err();

        let api = err.downcast_ref::<ApiError>().unwrap();
        assert!(api
            .user_message(&source.base_url())
            .contains("http://erp.test"));
        assert!(!dir.path().join("none").exists());
    }

    #[tokio::test]
    async fn forecast_trains_unless_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let source = FakeSource::default();
        let mut opts = options(Command::Page(Dashboard::Forecast), dir.path().to_path_buf());
        run(&source, &BlankRenderer, &opts, &mut std::io::sink()).await.unwrap();
        assert_eq!(source.trainings.load(Ordering::SeqCst), 1);

        opts.skip_training = true;
        run(&source, &BlankRenderer, &opts, &mut std::io::sink()).await.unwrap();
        assert_eq!(source.trainings.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn cards_command_filters_across_dashboards() {
        let dir = tempfile::tempdir().unwrap();
        let source = FakeSource::default();
        let mut opts = options(Command::Cards, dir.path().to_path_buf());
        opts.filter = Some("roi".into());
        let mut out: Vec<u8> = Vec::new();

        let summary = run(&source, &BlankRenderer, &opts, &mut out).await.unwrap();

        assert_eq!(summary.cards_shown, 1);
        assert!(summary.report.is_none());
        assert_eq!(source.trainings.load(Ordering::SeqCst), 0);
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("ROI"));
        assert!(!text.contains("Sales Dashboard"));
    }

    #[tokio::test]
    async fn cards_command_short_circuits_on_first_failure() {
        let dir = tempfile::tempdir().unwrap();
        let source = FakeSource {
            fail_on: Some(Endpoint::Accounts),
            ..Default::default()
        };
        let opts = options(Command::Cards, dir.path().to_path_buf());
        let mut out: Vec<u8> = Vec::new();
        let err = run(&source, &BlankRenderer, &opts, &mut out).await.unwrap_err();
        assert!(err.to_string().contains("Administrative Accounts Dashboard"));
        assert!(out.is_empty());
    }
}
