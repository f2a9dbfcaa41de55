//! Runtime configuration read from the environment.
//!
//! The binary loads an optional `.env` with `dotenvy` before calling
//! [`DriftConfig::from_env`].

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use chrono::{Months, NaiveDate};
use thiserror::Error;

pub const ALPHAVANTAGE_API_KEY_VAR: &str = "ALPHAVANTAGE_API_KEY";
pub const ALPHAVANTAGE_BASE_URL_VAR: &str = "ALPHAVANTAGE_BASE_URL";
pub const HTTP_TIMEOUT_VAR: &str = "POSTDRIFT_HTTP_TIMEOUT_SECS";

pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Configuration errors surfaced before any fetch is attempted.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} is not set. Get a free key at https://www.alphavantage.co/support/#api-key")]
    MissingApiKey(&'static str),
    #[error("Unknown history period '{0}'. Valid periods: 1y, 2y, 5y, 10y, max")]
    InvalidPeriod(String),
}

/// How far back to request daily bars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HistoryPeriod {
    OneYear,
    TwoYears,
    FiveYears,
    #[default]
    TenYears,
    Max,
}

impl HistoryPeriod {
    /// First date to request, counted back from `today`.
    pub fn start_date(&self, today: NaiveDate) -> NaiveDate {
        let years = match self {
            Self::OneYear => 1,
            Self::TwoYears => 2,
            Self::FiveYears => 5,
            Self::TenYears => 10,
            Self::Max => return NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or(NaiveDate::MIN),
        };
        today
            .checked_sub_months(Months::new(12 * years))
            .unwrap_or(NaiveDate::MIN)
    }
}

impl fmt::Display for HistoryPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::OneYear => "1y",
            Self::TwoYears => "2y",
            Self::FiveYears => "5y",
            Self::TenYears => "10y",
            Self::Max => "max",
        };
        f.write_str(label)
    }
}

impl FromStr for HistoryPeriod {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "1y" => Ok(Self::OneYear),
            "2y" => Ok(Self::TwoYears),
            "5y" => Ok(Self::FiveYears),
            "10y" => Ok(Self::TenYears),
            "max" => Ok(Self::Max),
            _ => Err(ConfigError::InvalidPeriod(s.to_string())),
        }
    }
}

/// Settings for the live data source.
#[derive(Debug, Clone)]
pub struct DriftConfig {
    pub alphavantage_api_key: String,
    pub alphavantage_base_url: Option<String>,
    pub http_timeout: Duration,
}

impl DriftConfig {
    /// Read configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let alphavantage_api_key = lookup(ALPHAVANTAGE_API_KEY_VAR)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::MissingApiKey(ALPHAVANTAGE_API_KEY_VAR))?;

        let alphavantage_base_url = lookup(ALPHAVANTAGE_BASE_URL_VAR)
            .map(|v| v.trim().trim_end_matches('/').to_string())
            .filter(|v| !v.is_empty());

        let timeout_secs = lookup(HTTP_TIMEOUT_VAR)
            .and_then(|v| v.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS);

        Ok(Self {
            alphavantage_api_key,
            alphavantage_base_url,
            http_timeout: Duration::from_secs(timeout_secs),
        })
    }
}
