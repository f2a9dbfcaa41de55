//! Alpha Vantage client module for fetching historical earnings reports.
//!
//! Supplies the earnings half of the live data source. Alpha Vantage reports
//! each quarter with its announcement date and the reported EPS, which is
//! exactly what the drift analysis needs.

pub mod client;
pub mod error;
pub mod types;

pub use client::{AlphaVantageClient, DEFAULT_BASE_URL};
pub use error::AlphaVantageError;
