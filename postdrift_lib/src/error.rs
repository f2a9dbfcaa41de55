//! Error types for the analysis pipeline.

use std::fmt;

use thiserror::Error;

use crate::source::SourceError;

/// Why no usable earnings events were found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EarningsGap {
    /// The source returned no events at all.
    Empty,
    /// Events exist but none carries a reported EPS.
    NoReportedEps,
}

/// Failures that abort an analysis run. Every variant is meant to be shown
/// to the user as-is.
#[derive(Error, Debug)]
pub enum DriftError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("{}", no_earnings_message(.ticker, .cause))]
    NoEarningsData { ticker: String, cause: EarningsGap },
    #[error("No historical price data available for {0}.")]
    NoHistoryData(String),
    #[error(
        "No sufficient data to analyze post-earnings drift for {0}. Possible reasons:\n\
         - Earnings dates do not align with trading days.\n\
         - Insufficient price data around earnings.\n\
         - Try a different ticker or check the data provider directly."
    )]
    InsufficientAlignedData(String),
    #[error("An error occurred: {0}. Please check the ticker or try again later.")]
    Unclassified(#[from] SourceError),
}

fn no_earnings_message(ticker: &str, cause: &EarningsGap) -> String {
    match cause {
        EarningsGap::Empty => format!(
            "No earnings data available for {}. Please check the ticker or try again later.",
            ticker
        ),
        EarningsGap::NoReportedEps => {
            format!("No past earnings with reported EPS for {}.", ticker)
        }
    }
}

impl fmt::Display for EarningsGap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("no earnings events"),
            Self::NoReportedEps => f.write_str("no events with reported EPS"),
        }
    }
}
