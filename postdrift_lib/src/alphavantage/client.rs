//! Alpha Vantage API client for fetching historical earnings dates.

use super::error::AlphaVantageError;
use super::types::EarningsResponse;
use crate::types::EarningsEvent;
use std::time::Duration;

/// Default request timeout for Alpha Vantage API calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Production API root.
pub const DEFAULT_BASE_URL: &str = "https://www.alphavantage.co";

/// Alpha Vantage REST API client for quarterly earnings reports.
pub struct AlphaVantageClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl AlphaVantageClient {
    /// Create a new AlphaVantageClient with custom base URL (for testing with wiremock).
    pub fn with_base_url(base_url: &str, api_key: String) -> Result<Self, AlphaVantageError> {
        Self::with_timeout(base_url, api_key, REQUEST_TIMEOUT)
    }

    /// Create a client with an explicit request timeout.
    pub fn with_timeout(
        base_url: &str,
        api_key: String,
        timeout: Duration,
    ) -> Result<Self, AlphaVantageError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch the quarterly earnings history for a ticker, newest first.
    ///
    /// Returns `Ok(vec![])` if Alpha Vantage knows nothing about the symbol
    /// (it answers with an empty object). Quarters with an unparseable report
    /// date are dropped.
    ///
    /// Alpha Vantage quirk: quota exhaustion and bad parameters come back as
    /// HTTP 200 with a `Note`/`Information` or `Error Message` body.
    pub async fn earnings(&self, ticker: &str) -> Result<Vec<EarningsEvent>, AlphaVantageError> {
        let url = format!("{}/query", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("function", "EARNINGS"),
                ("symbol", ticker),
                ("apikey", self.api_key.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(AlphaVantageError::InvalidApiKey(status.as_u16()));
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(AlphaVantageError::RateLimited(format!("HTTP {}", status)));
        }

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read response body".to_string());
            return Err(AlphaVantageError::InvalidRequest(format!(
                "HTTP {}: {}",
                status,
                snippet(&body, 200)
            )));
        }

        let body = response.text().await.map_err(|e| {
            AlphaVantageError::ParseFailed(format!("Failed to read response body: {}", e))
        })?;

        let parsed: EarningsResponse = serde_json::from_str(&body).map_err(|e| {
            AlphaVantageError::ParseFailed(format!(
                "Failed to deserialize response: {} | body: {}",
                e,
                snippet(&body, 500)
            ))
        })?;

        if let Some(message) = parsed.note.or(parsed.information) {
            tracing::warn!("Alpha Vantage throttled the request for {}", ticker);
            return Err(AlphaVantageError::RateLimited(message));
        }
        if let Some(message) = parsed.error_message {
            return Err(AlphaVantageError::InvalidRequest(message));
        }

        let total = parsed.quarterly_earnings.len();
        let events: Vec<EarningsEvent> = parsed
            .quarterly_earnings
            .iter()
            .filter_map(|q| q.to_event())
            .collect();
        if events.len() < total {
            tracing::warn!(
                "Dropped {} earnings rows for {} with unparseable report dates",
                total - events.len(),
                ticker
            );
        }

        Ok(events)
    }
}

fn snippet(body: &str, max: usize) -> &str {
    if body.len() <= max {
        return body;
    }
    let mut end = max;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    &body[..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn sample_earnings_json() -> serde_json::Value {
        serde_json::json!({
            "symbol": "MSFT",
            "annualEarnings": [
                { "fiscalDateEnding": "2024-06-30", "reportedEPS": "11.8" }
            ],
            "quarterlyEarnings": [
                {
                    "fiscalDateEnding": "2024-06-30",
                    "reportedDate": "2024-07-30",
                    "reportedEPS": "2.95",
                    "estimatedEPS": "2.93",
                    "surprise": "0.02",
                    "surprisePercentage": "0.6826",
                    "reportTime": "post-market"
                },
                {
                    "fiscalDateEnding": "2024-03-31",
                    "reportedDate": "2024-04-25",
                    "reportedEPS": "None",
                    "estimatedEPS": "2.82",
                    "surprise": "None",
                    "surprisePercentage": "None",
                    "reportTime": "post-market"
                }
            ]
        })
    }

    #[tokio::test]
    async fn success_returns_events() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/query"))
            .and(query_param("function", "EARNINGS"))
            .and(query_param("symbol", "MSFT"))
            .and(query_param("apikey", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(sample_earnings_json()))
            .mount(&server)
            .await;

        let client =
            AlphaVantageClient::with_base_url(&server.uri(), "test-key".to_string()).unwrap();
        let events = client.earnings("MSFT").await.unwrap();

        assert_eq!(events.len(), 2);
        assert_eq!(events[0].date, NaiveDate::from_ymd_opt(2024, 7, 30).unwrap());
        assert_eq!(events[0].reported_eps, Some(2.95));
        assert_eq!(events[1].reported_eps, None);
    }

    #[tokio::test]
    async fn empty_object_returns_empty() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/query"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&server)
            .await;

        let client =
            AlphaVantageClient::with_base_url(&server.uri(), "test-key".to_string()).unwrap();
        let events = client.earnings("ZZZZ").await.unwrap();
        assert!(events.is_empty());
    }

    #[tokio::test]
    async fn information_body_is_rate_limit() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/query"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "Information": "Our standard API rate limit is 25 requests per day."
            })))
            .mount(&server)
            .await;

        let client =
            AlphaVantageClient::with_base_url(&server.uri(), "test-key".to_string()).unwrap();
        let err = client.earnings("MSFT").await.unwrap_err();
        assert!(matches!(err, AlphaVantageError::RateLimited(ref m) if m.contains("25 requests")));
    }

    #[tokio::test]
    async fn error_message_body_is_invalid_request() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/query"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "Error Message": "Invalid API call."
            })))
            .mount(&server)
            .await;

        let client =
            AlphaVantageClient::with_base_url(&server.uri(), "test-key".to_string()).unwrap();
        let err = client.earnings("MSFT").await.unwrap_err();
        assert!(matches!(err, AlphaVantageError::InvalidRequest(_)));
    }

    #[tokio::test]
    async fn forbidden_is_invalid_api_key() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/query"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let client = AlphaVantageClient::with_base_url(&server.uri(), "bad".to_string()).unwrap();
        let err = client.earnings("MSFT").await.unwrap_err();
        assert!(matches!(err, AlphaVantageError::InvalidApiKey(403)));
    }

    #[tokio::test]
    async fn server_error_includes_status() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/query"))
            .respond_with(ResponseTemplate::new(503).set_body_string("upstream unavailable"))
            .mount(&server)
            .await;

        let client =
            AlphaVantageClient::with_base_url(&server.uri(), "test-key".to_string()).unwrap();
        let err = client.earnings("MSFT").await.unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("503"));
        assert!(msg.contains("upstream unavailable"));
    }

    #[tokio::test]
    async fn malformed_json_is_parse_failure() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/query"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{not valid json}"))
            .mount(&server)
            .await;

        let client =
            AlphaVantageClient::with_base_url(&server.uri(), "test-key".to_string()).unwrap();
        let err = client.earnings("MSFT").await.unwrap_err();
        assert!(matches!(err, AlphaVantageError::ParseFailed(_)));
    }

    #[test]
    fn alphavantage_error_display() {
        let err = AlphaVantageError::RateLimited("quota".to_string());
        assert!(err.to_string().contains("Rate limited"));

        let err = AlphaVantageError::InvalidApiKey(401);
        assert!(err.to_string().contains("Invalid API key"));
        assert!(err.to_string().contains("401"));

        let err = AlphaVantageError::ParseFailed("bad json".to_string());
        assert!(err.to_string().contains("parse"));
        assert!(err.to_string().contains("bad json"));
    }

    #[test]
    fn snippet_respects_char_boundaries() {
        assert_eq!(snippet("short", 200), "short");
        assert_eq!(snippet("abcdef", 3), "abc");
        // "é" is two bytes; cutting at 1 must back off to 0.
        assert_eq!(snippet("é", 1), "");
    }

    #[test]
    fn client_creation_with_default_base_url() {
        let client = AlphaVantageClient::with_base_url(DEFAULT_BASE_URL, "k".to_string()).unwrap();
        assert_eq!(client.base_url, "https://www.alphavantage.co");
    }

    #[test]
    fn client_creation_with_base_url() {
        let client = AlphaVantageClient::with_base_url("http://localhost:1234/", "k".to_string());
        assert!(client.is_ok());
        assert_eq!(client.unwrap().base_url, "http://localhost:1234");
    }
}
