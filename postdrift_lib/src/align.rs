//! Event-to-bar alignment.
//!
//! For an earnings date, the "pre" bar is the last session on or before that
//! date and the "post" bar is the first session strictly after it. A report
//! released on a weekend or holiday therefore pairs the previous trading day
//! with the next one; a report on a trading day pairs that day with the next.

use chrono::NaiveDate;
use thiserror::Error;

use crate::types::{DailyBar, PriceHistory};

/// The two sessions surrounding an earnings date.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarPair {
    pub pre: DailyBar,
    pub post: DailyBar,
}

/// Why an earnings date could not be paired with bars.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlignmentGap {
    #[error("no trading day on or before {0}")]
    NoPriorBar(NaiveDate),
    #[error("no trading day after {0}")]
    NoNextBar(NaiveDate),
}

/// Find the bars surrounding `earnings_date`.
pub fn align(history: &PriceHistory, earnings_date: NaiveDate) -> Result<BarPair, AlignmentGap> {
    let bars = history.bars();
    // Index of the first bar dated after the earnings date.
    let split = bars.partition_point(|b| b.date <= earnings_date);

    let pre = split
        .checked_sub(1)
        .and_then(|i| bars.get(i))
        .copied()
        .ok_or(AlignmentGap::NoPriorBar(earnings_date))?;
    let post = bars
        .get(split)
        .copied()
        .ok_or(AlignmentGap::NoNextBar(earnings_date))?;

    Ok(BarPair { pre, post })
}
