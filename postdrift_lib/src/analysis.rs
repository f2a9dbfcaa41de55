//! Post-earnings drift analysis: the orchestrator and its result types.
//!
//! [`analyze`] is the pure core over in-memory inputs. [`run_analysis`] adds
//! ticker validation and the two fetches, short-circuiting with a distinct
//! [`DriftError`] for each "no data" cause.

use serde::Serialize;

use crate::align::{align, AlignmentGap};
use crate::config::HistoryPeriod;
use crate::error::{DriftError, EarningsGap};
use crate::metrics::{gap_intraday_correlation, observe, same_direction_pct, AlignedObservation};
use crate::source::MarketDataSource;
use crate::types::{DailyBar, EarningsEvent, PriceHistory};
use crate::validation::validate_ticker;

/// Tally of earnings events that produced no observation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SkipCounts {
    pub no_prior_bar: usize,
    pub no_next_bar: usize,
    pub computation: usize,
}

impl SkipCounts {
    pub fn total(&self) -> usize {
        self.no_prior_bar + self.no_next_bar + self.computation
    }
}

/// Outcome of one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    pub ticker: String,
    /// In the order the earnings events were supplied.
    pub observations: Vec<AlignedObservation>,
    /// Pearson correlation of gap % vs intraday %. NaN when undefined.
    pub correlation: f64,
    pub same_direction_pct: f64,
    pub skipped: SkipCounts,
}

/// Reading of the correlation sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Interpretation {
    PositiveCorrelation,
    /// Covers zero, negative and undefined correlation.
    NoPositiveCorrelation,
}

impl Interpretation {
    pub fn message(&self) -> &'static str {
        match self {
            Self::PositiveCorrelation => {
                "Positive correlation detected, suggesting potential post-earnings drift \
                 in the same direction as the overnight gap."
            }
            Self::NoPositiveCorrelation => "No positive correlation found.",
        }
    }
}

pub const DISCLAIMER: &str =
    "Disclaimer: This is for educational purposes only, not financial advice.";

/// Qualitative trading suggestion derived from both statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategySuggestion {
    FollowTheGap,
    NoClearPattern,
}

impl StrategySuggestion {
    /// Bullet points for the suggestion, without the disclaimer.
    pub fn points(&self) -> &'static [&'static str] {
        match self {
            Self::FollowTheGap => &[
                "If the overnight gap post-earnings is positive (>0%), consider buying at open \
                 and holding intraday, expecting positive drift.",
                "If negative, consider shorting or avoiding.",
                "Risks: Historical patterns may not predict future results. Use stop-losses \
                 and proper position sizing.",
                "Next Steps: Backtest further or combine with other indicators.",
            ],
            Self::NoClearPattern => {
                &["No clear drift pattern detected. Consider other strategies for this stock."]
            }
        }
    }
}

impl AnalysisResult {
    /// `correlation > 0`; exactly zero and NaN are not positive.
    pub fn interpretation(&self) -> Interpretation {
        if self.correlation > 0.0 {
            Interpretation::PositiveCorrelation
        } else {
            Interpretation::NoPositiveCorrelation
        }
    }

    pub fn strategy(&self) -> StrategySuggestion {
        if self.correlation > 0.0 && self.same_direction_pct > 50.0 {
            StrategySuggestion::FollowTheGap
        } else {
            StrategySuggestion::NoClearPattern
        }
    }
}

/// Analyze already-fetched data.
///
/// Events without a reported EPS are ignored. Events are paired with the
/// surrounding bars; events that cannot be paired or whose arithmetic fails
/// are skipped and counted. Fails with `InsufficientAlignedData` when nothing
/// survives.
pub fn analyze(
    ticker: &str,
    events: &[EarningsEvent],
    bars: Vec<DailyBar>,
) -> Result<AnalysisResult, DriftError> {
    let reported: Vec<&EarningsEvent> = events.iter().filter(|e| e.is_reported()).collect();
    if reported.is_empty() {
        let cause = if events.is_empty() {
            EarningsGap::Empty
        } else {
            EarningsGap::NoReportedEps
        };
        return Err(DriftError::NoEarningsData {
            ticker: ticker.to_string(),
            cause,
        });
    }

    let history = PriceHistory::new(bars);
    if history.is_empty() {
        return Err(DriftError::NoHistoryData(ticker.to_string()));
    }
    if let (Some(first), Some(last)) = (history.first_date(), history.last_date()) {
        tracing::debug!("{}: {} bars from {} to {}", ticker, history.len(), first, last);
    }

    let mut observations = Vec::with_capacity(reported.len());
    let mut skipped = SkipCounts::default();

    for event in reported {
        let pair = match align(&history, event.date) {
            Ok(pair) => pair,
            Err(gap) => {
                tracing::debug!("Skipping earnings on {}: {}", event.date, gap);
                match gap {
                    AlignmentGap::NoPriorBar(_) => skipped.no_prior_bar += 1,
                    AlignmentGap::NoNextBar(_) => skipped.no_next_bar += 1,
                }
                continue;
            }
        };
        match observe(event.date, &pair) {
            Ok(observation) => observations.push(observation),
            Err(e) => {
                tracing::debug!("Skipping earnings on {}: {}", event.date, e);
                skipped.computation += 1;
            }
        }
    }

    if observations.is_empty() {
        return Err(DriftError::InsufficientAlignedData(ticker.to_string()));
    }

    let correlation = gap_intraday_correlation(&observations);
    let same_direction_pct = same_direction_pct(&observations);

    Ok(AnalysisResult {
        ticker: ticker.to_string(),
        observations,
        correlation,
        same_direction_pct,
        skipped,
    })
}

/// Validate the ticker, fetch both data sets and analyze them.
///
/// Earnings are checked before prices are requested, so a ticker with no
/// earnings never costs a price fetch.
pub async fn run_analysis<S: MarketDataSource>(
    source: &S,
    ticker: &str,
    period: HistoryPeriod,
) -> Result<AnalysisResult, DriftError> {
    let ticker = validate_ticker(ticker)?;

    let events = source.earnings_events(&ticker).await?;
    let reported = events.iter().filter(|e| e.is_reported()).count();
    tracing::info!(
        "Fetched {} earnings events for {} ({} with reported EPS)",
        events.len(),
        ticker,
        reported
    );
    if reported == 0 {
        let cause = if events.is_empty() {
            EarningsGap::Empty
        } else {
            EarningsGap::NoReportedEps
        };
        tracing::info!("Stopping analysis for {}: {}", ticker, cause);
        return Err(DriftError::NoEarningsData { ticker, cause });
    }

    let bars = source.daily_history(&ticker, period).await?;
    tracing::info!("Fetched {} daily bars for {} ({})", bars.len(), ticker, period);

    let result = analyze(&ticker, &events, bars)?;
    if result.skipped.total() > 0 {
        tracing::info!(
            "{} of {} reported earnings events skipped for {}",
            result.skipped.total(),
            reported,
            ticker
        );
    }
    Ok(result)
}
