//! The data-source seam of the pipeline.
//!
//! [`MarketDataSource`] is all the orchestrator knows about where data comes
//! from. [`LiveSource`] is the production implementation: earnings from
//! Alpha Vantage, daily bars from Yahoo Finance.

use thiserror::Error;

use crate::alphavantage::{AlphaVantageClient, AlphaVantageError, DEFAULT_BASE_URL};
use crate::config::{DriftConfig, HistoryPeriod};
use crate::types::{DailyBar, EarningsEvent};
use crate::yahoo::{YahooClient, YahooError};

/// Errors raised by a data source while fetching.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("earnings source: {0}")]
    Earnings(#[from] AlphaVantageError),
    #[error("price source: {0}")]
    Prices(#[from] YahooError),
    #[error("{0}")]
    Other(String),
}

/// Supplies earnings events and daily bars for a ticker.
///
/// Implementations return dates already normalized to timezone-free calendar
/// dates. An empty vector means "no data", not an error.
#[allow(async_fn_in_trait)]
pub trait MarketDataSource {
    async fn earnings_events(&self, ticker: &str) -> Result<Vec<EarningsEvent>, SourceError>;

    async fn daily_history(
        &self,
        ticker: &str,
        period: HistoryPeriod,
    ) -> Result<Vec<DailyBar>, SourceError>;
}

/// Alpha Vantage earnings plus Yahoo Finance prices.
pub struct LiveSource {
    earnings: AlphaVantageClient,
    prices: YahooClient,
}

impl LiveSource {
    pub fn new(earnings: AlphaVantageClient, prices: YahooClient) -> Self {
        Self { earnings, prices }
    }

    /// Build both clients from configuration.
    pub fn from_config(config: &DriftConfig) -> Result<Self, SourceError> {
        let base_url = config
            .alphavantage_base_url
            .as_deref()
            .unwrap_or(DEFAULT_BASE_URL);
        let earnings = AlphaVantageClient::with_timeout(
            base_url,
            config.alphavantage_api_key.clone(),
            config.http_timeout,
        )?;
        let prices = YahooClient::new()?;
        Ok(Self::new(earnings, prices))
    }
}

impl MarketDataSource for LiveSource {
    async fn earnings_events(&self, ticker: &str) -> Result<Vec<EarningsEvent>, SourceError> {
        Ok(self.earnings.earnings(ticker).await?)
    }

    async fn daily_history(
        &self,
        ticker: &str,
        period: HistoryPeriod,
    ) -> Result<Vec<DailyBar>, SourceError> {
        Ok(self.prices.daily_history(ticker, period).await?)
    }
}
