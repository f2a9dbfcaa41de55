mod interactive;
mod output;
mod progress;

use std::process::ExitCode;

use anyhow::{anyhow, Result};
use clap::Parser;
use postdrift_lib::{DriftConfig, HistoryPeriod, LiveSource};
use tracing_subscriber::EnvFilter;

use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "postdrift")]
#[command(about = "Check whether post-earnings overnight gaps correlate with the following intraday move")]
struct Cli {
    /// Stock ticker (e.g. MSFT, NVDA, AAPL). Omit to be prompted interactively.
    ticker: Option<String>,

    /// Output format: table, json, csv, markdown
    #[arg(long, default_value = "table", global = true)]
    output: String,

    /// Price history lookback: 1y, 2y, 5y, 10y, max
    #[arg(long, default_value = "10y")]
    period: String,
}

const DEFAULT_LOG_FILTER: &str = "postdrift_cli=info,postdrift_lib=info";

/// `RUST_LOG` replaces the default directives entirely when set and valid.
fn log_filter(rust_log: Option<&str>) -> EnvFilter {
    rust_log
        .filter(|value| !value.trim().is_empty())
        .and_then(|value| EnvFilter::try_new(value).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    dotenvy::dotenv().ok();

    let rust_log = std::env::var("RUST_LOG").ok();
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(rust_log.as_deref()))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let format = OutputFormat::parse(&cli.output);
    let period: HistoryPeriod = cli.period.parse()?;

    let config = DriftConfig::from_env()?;
    let source = LiveSource::from_config(&config)
        .map_err(|e| anyhow!("Failed to create data source: {}", e))?;

    match cli.ticker {
        Some(ticker) => {
            let outcome = progress::analyze_with_spinner(&source, &ticker, period).await;
            if !output::print_outcome(&outcome, &format)? {
                return Ok(ExitCode::FAILURE);
            }
        }
        None => interactive::run(&source, period, &format).await?,
    }

    Ok(ExitCode::SUCCESS)
}
