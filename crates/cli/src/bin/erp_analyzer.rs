use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use api_client::{ApiClient, ApiConfig, ApiError};
use charts::PlottersRenderer;
use clap::{Parser, Subcommand};
use erp_analyzer::{Command as RunCommand, Dashboard, RunOptions};
use kpi_engine::Locale;
use logger::LogFormat;
use tracing::{info, warn};

const DEFAULT_LOG_DIRECTIVES: &str = "warn,erp_analyzer=info,api_client=info,report=info";

/// Fetch ERP KPIs, print the dashboard cards and export PDF reports.
#[derive(Debug, Parser)]
#[command(name = "erp-analyzer", version)]
struct Cli {
    /// Backend base URL. Falls back to ERP_API_URL, REACT_APP_API_URL, then http://127.0.0.1:5002
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Directory reports are written to
    #[arg(long, global = true, default_value = "reports")]
    out_dir: PathBuf,

    /// Print the cards without exporting a report
    #[arg(long, global = true)]
    no_export: bool,

    /// Only show cards whose title, description, category or value contain this text
    #[arg(long, global = true)]
    filter: Option<String>,

    /// Print cards as JSON
    #[arg(long, global = true)]
    json: bool,

    #[arg(long, global = true, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,

    /// Month names in labels (en or es)
    #[arg(long, global = true, default_value_t = Locale::En)]
    locale: Locale,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Financial summary and cash flow
    Finance,
    /// Administrative accounts: receivables and payables
    Accounts,
    /// Sales by period and top customers
    Sales,
    /// Operational expenses and top suppliers
    Expenses,
    /// Sales forecast from the ML service
    Forecast {
        /// Use the last trained model instead of retraining first
        #[arg(long)]
        skip_training: bool,
    },
    /// Cards of every dashboard
    Cards,
}

impl Cli {
    fn run_options(&self) -> RunOptions {
        let (command, skip_training) = match self.command {
            Commands::Finance => (RunCommand::Page(Dashboard::Finance), false),
            Commands::Accounts => (RunCommand::Page(Dashboard::Accounts), false),
            Commands::Sales => (RunCommand::Page(Dashboard::Sales), false),
            Commands::Expenses => (RunCommand::Page(Dashboard::Expenses), false),
            Commands::Forecast { skip_training } => {
                (RunCommand::Page(Dashboard::Forecast), skip_training)
            }
            Commands::Cards => (RunCommand::Cards, true),
        };
        RunOptions {
            command,
            locale: self.locale,
            skip_training,
            filter: self.filter.clone(),
            export: !self.no_export,
            out_dir: self.out_dir.clone(),
            json: self.json,
        }
    }
}

async fn run(cli: &Cli, client: &ApiClient) -> Result<()> {
    let cancel = client.cancellation_token().clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupted, cancelling pending requests");
            cancel.cancel();
        }
    });

    let options = cli.run_options();
    let mut stdout = std::io::stdout();
    let summary = erp_analyzer::run(client, &PlottersRenderer, &options, &mut stdout).await?;
    if let Some(path) = summary.report {
        println!("Report saved to {}", path.display());
    }
    info!(cards = summary.cards_shown, "done");
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    if let Err(e) = logger::init(DEFAULT_LOG_DIRECTIVES, cli.log_format) {
        eprintln!("Failed to initialise logging: {e}");
    }

    let config = match &cli.api_url {
        Some(url) => ApiConfig::new(url),
        None => ApiConfig::from_env(),
    };
    let client = match ApiClient::new(config).context("configuring the API client") {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Error: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    match run(&cli, &client).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match e.downcast_ref::<ApiError>() {
                Some(api) if api.is_cancelled() => eprintln!("Cancelled."),
                Some(api) => eprintln!("{}", api.user_message(client.base_url().as_str())),
                None => eprintln!("Error: {e:#}"),
            }
            ExitCode::FAILURE
        }
    }
}
