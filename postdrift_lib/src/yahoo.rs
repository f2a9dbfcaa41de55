//! Yahoo Finance client wrapper for fetching daily price history.
//!
//! Provides YahooClient with a method to fetch daily open/close bars over a
//! lookback period. Bar timestamps are converted to exchange-local calendar
//! dates here so the analysis core only ever sees `NaiveDate`.

use chrono::{NaiveDate, Utc};
use thiserror::Error;
use time::OffsetDateTime;

use crate::config::HistoryPeriod;
use crate::types::DailyBar;

/// Errors from Yahoo Finance operations.
#[derive(Error, Debug)]
pub enum YahooError {
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error(transparent)]
    Upstream(#[from] yahoo_finance_api::YahooError),
}

/// Convert chrono::NaiveDate to time::OffsetDateTime at UTC midnight.
pub fn date_to_offset_datetime(date: NaiveDate) -> Result<OffsetDateTime, YahooError> {
    let datetime = date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| YahooError::InvalidDate(date.to_string()))?;

    let timestamp = datetime.and_utc().timestamp();

    OffsetDateTime::from_unix_timestamp(timestamp)
        .map_err(|_| YahooError::InvalidDate(date.to_string()))
}

/// Exchange-local trading date of a bar.
///
/// Yahoo stamps daily bars with the session open as a UTC epoch. Shifting by
/// the exchange's `gmtoffset` before truncating keeps markets east of UTC
/// (Sydney opens before midnight UTC) on the correct calendar day.
pub fn bar_date(timestamp: i64, gmtoffset_secs: i64) -> Option<NaiveDate> {
    let local = timestamp.checked_add(gmtoffset_secs)?;
    chrono::DateTime::from_timestamp(local, 0).map(|dt| dt.date_naive())
}

/// Build a bar from raw quote fields. Rows with missing (NaN) prices are
/// rejected; zero prices pass through and are dealt with by the calculator.
pub fn bar_from_quote(
    timestamp: i64,
    gmtoffset_secs: i64,
    open: f64,
    close: f64,
) -> Option<DailyBar> {
    if !(open.is_finite() && close.is_finite()) {
        return None;
    }
    bar_date(timestamp, gmtoffset_secs).map(|date| DailyBar::new(date, open, close))
}

/// Yahoo Finance client for daily bars.
pub struct YahooClient {
    connector: yahoo_finance_api::YahooConnector,
}

impl YahooClient {
    /// Create a new YahooClient with default configuration.
    pub fn new() -> Result<Self, YahooError> {
        Ok(Self {
            connector: yahoo_finance_api::YahooConnector::new()?,
        })
    }

    /// Fetch daily bars for `ticker` from the start of `period` until now.
    ///
    /// Returns `Ok(vec![])` when Yahoo answers but has no quotes for the
    /// range. Unknown tickers surface as an upstream error.
    pub async fn daily_history(
        &self,
        ticker: &str,
        period: HistoryPeriod,
    ) -> Result<Vec<DailyBar>, YahooError> {
        let today = Utc::now().date_naive();
        let start = date_to_offset_datetime(period.start_date(today))?;
        let end = OffsetDateTime::now_utc();

        let response = self.connector.get_quote_history(ticker, start, end).await?;

        let gmtoffset = match response.metadata() {
            Ok(meta) => i64::from(meta.gmtoffset),
            Err(e) => {
                tracing::warn!("No exchange metadata for {} ({}), assuming UTC dates", ticker, e);
                0
            }
        };

        let quotes = match response.quotes() {
            Ok(quotes) => quotes,
            Err(e) => {
                tracing::warn!("Yahoo returned no quotes for {}: {}", ticker, e);
                return Ok(Vec::new());
            }
        };

        let total = quotes.len();
        let bars: Vec<DailyBar> = quotes
            .iter()
            .filter_map(|q| bar_from_quote(q.timestamp as i64, gmtoffset, q.open, q.close))
            .collect();
        if bars.len() < total {
            tracing::debug!(
                "Dropped {} incomplete Yahoo rows for {}",
                total - bars.len(),
                ticker
            );
        }

        Ok(bars)
    }
}
