//! Input records shared by the data sources and the analysis core.
//!
//! All dates are timezone-free calendar dates. Converting provider timestamps
//! into `NaiveDate` is the job of the source adapters, never of the core.

use chrono::NaiveDate;
use serde::Serialize;

/// A single historical earnings report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EarningsEvent {
    pub date: NaiveDate,
    /// `None` for scheduled or unreported quarters.
    pub reported_eps: Option<f64>,
}

impl EarningsEvent {
    pub fn new(date: NaiveDate, reported_eps: Option<f64>) -> Self {
        Self { date, reported_eps }
    }

    /// True when the report carries an actual EPS figure.
    pub fn is_reported(&self) -> bool {
        self.reported_eps.is_some_and(|eps| eps.is_finite())
    }
}

/// One daily session. High, low and volume are not needed by the analysis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DailyBar {
    pub date: NaiveDate,
    pub open: f64,
    pub close: f64,
}

impl DailyBar {
    pub fn new(date: NaiveDate, open: f64, close: f64) -> Self {
        Self { date, open, close }
    }
}

/// Daily bars sorted ascending by date with unique dates.
///
/// Duplicate dates keep the row that appeared last in the input, which for
/// Yahoo is the freshest snapshot of the current session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceHistory {
    bars: Vec<DailyBar>,
}

impl PriceHistory {
    pub fn new(mut bars: Vec<DailyBar>) -> Self {
        // Stable sort keeps input order among equal dates.
        bars.sort_by_key(|b| b.date);
        let mut deduped: Vec<DailyBar> = Vec::with_capacity(bars.len());
        for bar in bars {
            match deduped.last_mut() {
                Some(last) if last.date == bar.date => *last = bar,
                _ => deduped.push(bar),
            }
        }
        Self { bars: deduped }
    }

    pub fn bars(&self) -> &[DailyBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.bars.first().map(|b| b.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.bars.last().map(|b| b.date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_is_reported() {
        assert!(EarningsEvent::new(d(2024, 1, 30), Some(2.93)).is_reported());
        assert!(EarningsEvent::new(d(2024, 1, 30), Some(0.0)).is_reported());
        assert!(!EarningsEvent::new(d(2024, 1, 30), None).is_reported());
        assert!(!EarningsEvent::new(d(2024, 1, 30), Some(f64::NAN)).is_reported());
    }

    #[test]
    fn test_price_history_sorts() {
        let history = PriceHistory::new(vec![
            DailyBar::new(d(2024, 1, 3), 1.0, 1.0),
            DailyBar::new(d(2024, 1, 1), 2.0, 2.0),
            DailyBar::new(d(2024, 1, 2), 3.0, 3.0),
        ]);
        let dates: Vec<NaiveDate> = history.bars().iter().map(|b| b.date).collect();
        assert_eq!(dates, vec![d(2024, 1, 1), d(2024, 1, 2), d(2024, 1, 3)]);
        assert_eq!(history.first_date(), Some(d(2024, 1, 1)));
        assert_eq!(history.last_date(), Some(d(2024, 1, 3)));
    }

    #[test]
    fn test_price_history_dedup_keeps_last() {
        let history = PriceHistory::new(vec![
            DailyBar::new(d(2024, 1, 2), 10.0, 11.0),
            DailyBar::new(d(2024, 1, 1), 9.0, 9.5),
            DailyBar::new(d(2024, 1, 2), 10.5, 12.0),
        ]);
        assert_eq!(history.len(), 2);
        assert_eq!(history.bars()[1], DailyBar::new(d(2024, 1, 2), 10.5, 12.0));
    }

    #[test]
    fn test_price_history_empty() {
        let history = PriceHistory::new(vec![]);
        assert!(history.is_empty());
        assert_eq!(history.first_date(), None);
    }
}
