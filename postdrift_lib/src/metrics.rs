//! Gap and intraday return calculations plus the two aggregate statistics.
//!
//! Per-event figures are rounded to two decimals before they are stored, and
//! the aggregates are computed over the rounded series.

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

use crate::align::BarPair;

/// Per-observation arithmetic failure. The observation is dropped and the
/// rest of the batch continues.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ComputationError {
    #[error("pre-earnings close is zero on {0}")]
    ZeroPreClose(NaiveDate),
    #[error("post-earnings open is zero on {0}")]
    ZeroPostOpen(NaiveDate),
    #[error("non-finite {field} for earnings on {earnings_date}")]
    NonFinite {
        field: &'static str,
        earnings_date: NaiveDate,
    },
}

/// One earnings event paired with its surrounding sessions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlignedObservation {
    pub earnings_date: NaiveDate,
    pub pre_date: NaiveDate,
    pub post_date: NaiveDate,
    pub pre_close: f64,
    pub post_open: f64,
    pub post_close: f64,
    /// Overnight gap, pre close to post open, in percent.
    pub gap_pct: f64,
    /// Post session open to close, in percent.
    pub intraday_pct: f64,
}

/// Round to two decimal places. Values that round to zero come back as
/// positive zero so they never print as `-0.00`.
pub fn round2(value: f64) -> f64 {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Build the observation for an aligned event.
pub fn observe(
    earnings_date: NaiveDate,
    pair: &BarPair,
) -> Result<AlignedObservation, ComputationError> {
    let pre_close = pair.pre.close;
    let post_open = pair.post.open;
    let post_close = pair.post.close;

    if pre_close == 0.0 {
        return Err(ComputationError::ZeroPreClose(pair.pre.date));
    }
    if post_open == 0.0 {
        return Err(ComputationError::ZeroPostOpen(pair.post.date));
    }

    let gap_pct = (post_open - pre_close) / pre_close * 100.0;
    let intraday_pct = (post_close - post_open) / post_open * 100.0;

    if !gap_pct.is_finite() {
        return Err(ComputationError::NonFinite {
            field: "gap_pct",
            earnings_date,
        });
    }
    if !intraday_pct.is_finite() {
        return Err(ComputationError::NonFinite {
            field: "intraday_pct",
            earnings_date,
        });
    }

    Ok(AlignedObservation {
        earnings_date,
        pre_date: pair.pre.date,
        post_date: pair.post.date,
        pre_close,
        post_open,
        post_close,
        gap_pct: round2(gap_pct),
        intraday_pct: round2(intraday_pct),
    })
}

/// Pearson correlation coefficient of two equal-length series.
///
/// Returns NaN when fewer than two pairs are given, when the lengths differ,
/// or when either series has zero variance.
pub fn pearson_correlation(xs: &[f64], ys: &[f64]) -> f64 {
    if xs.len() != ys.len() || xs.len() < 2 {
        return f64::NAN;
    }
    if is_constant(xs) || is_constant(ys) {
        return f64::NAN;
    }

    let n = xs.len() as f64;
    let mean_x = xs.iter().sum::<f64>() / n;
    let mean_y = ys.iter().sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return f64::NAN;
    }

    (cov / (var_x.sqrt() * var_y.sqrt())).clamp(-1.0, 1.0)
}

fn is_constant(values: &[f64]) -> bool {
    values.windows(2).all(|w| w[0] == w[1])
}

/// Sign as -1, 0 or 1. Unlike `f64::signum`, zero maps to zero.
fn sign(value: f64) -> i8 {
    if value > 0.0 {
        1
    } else if value < 0.0 {
        -1
    } else {
        0
    }
}

/// Percentage of non-zero-gap observations whose intraday move has the same
/// sign as the gap. A flat intraday move never counts as the same direction.
/// Returns 0 when every gap is zero or there are no observations.
pub fn same_direction_pct(observations: &[AlignedObservation]) -> f64 {
    let (considered, matching) = observations
        .iter()
        .filter(|o| o.gap_pct != 0.0)
        .fold((0usize, 0usize), |(considered, matching), o| {
            let same = sign(o.gap_pct) == sign(o.intraday_pct);
            (considered + 1, matching + usize::from(same))
        });

    if considered == 0 {
        return 0.0;
    }
    matching as f64 / considered as f64 * 100.0
}

/// Correlation between the gap and intraday series of `observations`.
pub fn gap_intraday_correlation(observations: &[AlignedObservation]) -> f64 {
    let gaps: Vec<f64> = observations.iter().map(|o| o.gap_pct).collect();
    let intraday: Vec<f64> = observations.iter().map(|o| o.intraday_pct).collect();
    pearson_correlation(&gaps, &intraday)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DailyBar;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn pair(pre_close: f64, post_open: f64, post_close: f64) -> BarPair {
        BarPair {
            pre: DailyBar::new(d(2024, 1, 1), 100.0, pre_close),
            post: DailyBar::new(d(2024, 1, 2), post_open, post_close),
        }
    }

    fn obs(gap_pct: f64, intraday_pct: f64) -> AlignedObservation {
        AlignedObservation {
            earnings_date: d(2024, 1, 1),
            pre_date: d(2024, 1, 1),
            post_date: d(2024, 1, 2),
            pre_close: 100.0,
            post_open: 100.0,
            post_close: 100.0,
            gap_pct,
            intraday_pct,
        }
    }

    #[test]
    fn test_observe_worked_example() {
        let o = observe(d(2024, 1, 1), &pair(102.0, 103.0, 101.0)).unwrap();
        assert_eq!(o.gap_pct, 0.98);
        assert_eq!(o.intraday_pct, -1.94);
        assert_eq!(o.pre_date, d(2024, 1, 1));
        assert_eq!(o.post_date, d(2024, 1, 2));
    }

    #[test]
    fn test_observe_zero_pre_close() {
        let err = observe(d(2024, 1, 1), &pair(0.0, 103.0, 101.0)).unwrap_err();
        assert_eq!(err, ComputationError::ZeroPreClose(d(2024, 1, 1)));
    }

    #[test]
    fn test_observe_zero_post_open() {
        let err = observe(d(2024, 1, 1), &pair(102.0, 0.0, 101.0)).unwrap_err();
        assert_eq!(err, ComputationError::ZeroPostOpen(d(2024, 1, 2)));
    }

    #[test]
    fn test_observe_nan_price() {
        let err = observe(d(2024, 1, 1), &pair(102.0, 103.0, f64::NAN)).unwrap_err();
        assert!(matches!(
            err,
            ComputationError::NonFinite {
                field: "intraday_pct",
                ..
            }
        ));
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(0.980392), 0.98);
        assert_eq!(round2(-1.941747), -1.94);
        assert_eq!(round2(2.0), 2.0);
        assert_eq!(round2(-0.004), 0.0);
        assert!(round2(-0.004).is_sign_positive());
        assert!(round2(f64::NAN).is_nan());
    }

    #[test]
    fn test_observe_tiny_negative_gap_is_positive_zero() {
        let o = observe(d(2024, 1, 1), &pair(1000.0, 999.96, 999.96)).unwrap();
        assert_eq!(o.gap_pct, 0.0);
        assert!(o.gap_pct.is_sign_positive());
        assert_eq!(serde_json::to_string(&o.gap_pct).unwrap(), "0.0");
    }

    #[test]
    fn test_correlation_perfect_positive() {
        let r = pearson_correlation(&[1.0, 2.0, 3.0, 4.0], &[2.0, 4.0, 6.0, 8.0]);
        assert!((r - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_correlation_perfect_negative() {
        let r = pearson_correlation(&[1.0, 2.0, 3.0], &[3.0, 2.0, 1.0]);
        assert!((r + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_correlation_known_value() {
        // r = 0.8 for this textbook pair.
        let xs = [1.0, 2.0, 3.0, 4.0, 5.0];
        let ys = [2.0, 1.0, 4.0, 3.0, 5.0];
        assert!((pearson_correlation(&xs, &ys) - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_correlation_symmetric() {
        let xs = [0.98, -2.31, 4.12, 0.07, -0.55, 1.6];
        let ys = [-1.94, 0.4, 2.2, -0.3, -1.1, 0.9];
        let a = pearson_correlation(&xs, &ys);
        let b = pearson_correlation(&ys, &xs);
        assert_eq!(a.to_bits(), b.to_bits());
    }

    #[test]
    fn test_correlation_single_pair_is_nan() {
        assert!(pearson_correlation(&[1.0], &[2.0]).is_nan());
        assert!(pearson_correlation(&[], &[]).is_nan());
    }

    #[test]
    fn test_correlation_zero_variance_is_nan() {
        assert!(pearson_correlation(&[1.5, 1.5, 1.5], &[1.0, 2.0, 3.0]).is_nan());
        assert!(pearson_correlation(&[1.0, 2.0, 3.0], &[0.1, 0.1, 0.1]).is_nan());
    }

    #[test]
    fn test_correlation_length_mismatch_is_nan() {
        assert!(pearson_correlation(&[1.0, 2.0, 3.0], &[1.0, 2.0]).is_nan());
    }

    #[test]
    fn test_same_direction_mixed() {
        let observations = vec![obs(1.0, 2.0), obs(-1.0, -0.5), obs(2.0, -1.0), obs(-3.0, 1.0)];
        assert_eq!(same_direction_pct(&observations), 50.0);
    }

    #[test]
    fn test_same_direction_ignores_zero_gaps() {
        let observations = vec![obs(0.0, 5.0), obs(0.0, -5.0), obs(1.0, 1.0)];
        assert_eq!(same_direction_pct(&observations), 100.0);
    }

    #[test]
    fn test_same_direction_flat_intraday_is_not_same() {
        let observations = vec![obs(1.0, 0.0), obs(1.0, 1.0)];
        assert_eq!(same_direction_pct(&observations), 50.0);
    }

    #[test]
    fn test_same_direction_all_zero_gaps() {
        assert_eq!(same_direction_pct(&[obs(0.0, 1.0), obs(0.0, -2.0)]), 0.0);
        assert_eq!(same_direction_pct(&[]), 0.0);
    }

    #[test]
    fn test_same_direction_bounds() {
        let cases = vec![
            vec![obs(1.0, 1.0)],
            vec![obs(1.0, -1.0)],
            vec![obs(-0.5, -0.2), obs(0.3, -0.1), obs(2.0, 0.0)],
        ];
        for observations in cases {
            let pct = same_direction_pct(&observations);
            assert!((0.0..=100.0).contains(&pct));
        }
    }

    #[test]
    fn test_gap_intraday_correlation() {
        let observations = vec![obs(1.0, 2.0), obs(2.0, 4.0), obs(3.0, 6.5)];
        assert!(gap_intraday_correlation(&observations) > 0.99);
        assert!(gap_intraday_correlation(&observations[..1]).is_nan());
    }
}
