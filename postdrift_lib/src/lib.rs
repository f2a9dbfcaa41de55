//! Library layer for postdrift: post-earnings gap vs intraday drift analysis.
//!
//! The analysis core (`align`, `metrics`, `analysis::analyze`) is pure and
//! works on in-memory earnings events and daily bars. Fetching sits behind
//! the `source::MarketDataSource` trait, with a live implementation backed by
//! Alpha Vantage (earnings) and Yahoo Finance (prices).

pub mod align;
pub mod alphavantage;
pub mod analysis;
pub mod config;
pub mod error;
pub mod metrics;
pub mod source;
pub mod types;
pub mod validation;
pub mod yahoo;

pub use analysis::{
    analyze, run_analysis, AnalysisResult, Interpretation, SkipCounts, StrategySuggestion,
    DISCLAIMER,
};
pub use config::{ConfigError, DriftConfig, HistoryPeriod};
pub use error::{DriftError, EarningsGap};
pub use metrics::{AlignedObservation, ComputationError};
pub use source::{LiveSource, MarketDataSource, SourceError};
pub use types::{DailyBar, EarningsEvent, PriceHistory};
