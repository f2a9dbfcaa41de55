//! Response types for the Alpha Vantage `EARNINGS` endpoint.

use chrono::NaiveDate;
use serde::Deserialize;

use crate::types::EarningsEvent;

/// Top-level `EARNINGS` response.
///
/// Alpha Vantage answers quota and key problems with HTTP 200 and a body that
/// holds only `Note`, `Information` or `Error Message`, so every field is
/// optional and the client inspects them before trusting the data.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EarningsResponse {
    pub symbol: Option<String>,
    #[serde(default)]
    pub quarterly_earnings: Vec<QuarterlyEarning>,
    #[serde(rename = "Note")]
    pub note: Option<String>,
    #[serde(rename = "Information")]
    pub information: Option<String>,
    #[serde(rename = "Error Message")]
    pub error_message: Option<String>,
}

/// A single quarterly report. Numeric fields arrive as strings and use the
/// literal `"None"` when missing.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuarterlyEarning {
    pub fiscal_date_ending: String,
    pub reported_date: String,
    #[serde(rename = "reportedEPS")]
    pub reported_eps: Option<String>,
    #[serde(rename = "estimatedEPS")]
    pub estimated_eps: Option<String>,
    pub report_time: Option<String>,
}

/// Parse one of Alpha Vantage's numeric strings.
pub fn parse_numeric(value: Option<&str>) -> Option<f64> {
    let raw = value?.trim();
    if raw.is_empty() || raw.eq_ignore_ascii_case("none") {
        return None;
    }
    raw.parse::<f64>().ok().filter(|v| v.is_finite())
}

impl QuarterlyEarning {
    /// Convert to the domain event. Returns `None` when the report date is
    /// not a valid `YYYY-MM-DD` date.
    pub fn to_event(&self) -> Option<EarningsEvent> {
        let date = NaiveDate::parse_from_str(self.reported_date.trim(), "%Y-%m-%d").ok()?;
        Some(EarningsEvent::new(
            date,
            parse_numeric(self.reported_eps.as_deref()),
        ))
    }
}
