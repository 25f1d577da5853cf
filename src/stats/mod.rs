//! Aggregation Engine: sample sequences → mean ± standard error
//!
//! `summarize` is a pure function of a sequence's contents:
//!
//! | n    | mean        | standard_error             |
//! |------|-------------|----------------------------|
//! | 0    | 0           | 0                          |
//! | 1    | the sample  | 0                          |
//! | >1   | Σx / n      | s / √n, s with divisor n-1 |
//!
//! Zero or one observations are valid, statistically limited results and
//! never an error.

mod table;

pub use table::{SummaryRow, SummaryTable};

use serde::{Deserialize, Serialize};

/// Summary of one (key, field) sequence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryStat {
    /// Arithmetic mean
    pub mean: f64,
    /// Standard error of the mean (sample std / √n)
    pub standard_error: f64,
    /// Number of samples
    pub count: usize,
}

impl SummaryStat {
    /// True if the sequence had no samples. Callers treat this as "no data".
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// Reduce samples to mean, standard error and count.
///
/// # Example
///
/// ```rust
/// use coherency_stats::stats::summarize;
///
/// let stat = summarize(&[2.0, 4.0, 6.0]);
/// assert_eq!(stat.mean, 4.0);
/// assert_eq!(stat.count, 3);
/// assert!((stat.standard_error - 2.0 / 3f64.sqrt()).abs() < 1e-12);
///
/// assert_eq!(summarize(&[]).mean, 0.0);
/// assert_eq!(summarize(&[7.5]).standard_error, 0.0);
/// ```
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn summarize(values: &[f64]) -> SummaryStat {
    let count = values.len();
    match count {
        0 => SummaryStat::default(),
        1 => SummaryStat {
            mean: values[0],
            standard_error: 0.0,
            count,
        },
        _ => {
            let n = count as f64;
            let mean = values.iter().sum::<f64>() / n;
            let ss = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>();
            let sample_std = (ss / (n - 1.0)).sqrt();
            SummaryStat {
                mean,
                standard_error: sample_std / n.sqrt(),
                count,
            }
        }
    }
}

/// `numerator / denominator`, defined as `0` when the denominator is zero.
#[must_use]
pub fn guarded_ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_sequence() {
        assert_eq!(
            summarize(&[]),
            SummaryStat {
                mean: 0.0,
                standard_error: 0.0,
                count: 0
            }
        );
        assert!(summarize(&[]).is_empty());
    }

    #[test]
    fn test_singleton_sequence() {
        let stat = summarize(&[5.0]);
        assert_eq!(stat.mean, 5.0);
        assert_eq!(stat.standard_error, 0.0);
        assert_eq!(stat.count, 1);
    }

    #[test]
    fn test_identical_samples_have_zero_spread() {
        let stat = summarize(&[20.0, 20.0]);
        assert_eq!(stat.mean, 20.0);
        assert_eq!(stat.standard_error, 0.0);
        assert_eq!(stat.count, 2);
    }

    #[test]
    fn test_bessel_corrected_sem() {
        // sample std of [1, 2, 3, 4] = sqrt(5/3); sem = that / 2
        let stat = summarize(&[1.0, 2.0, 3.0, 4.0]);
        assert!((stat.mean - 2.5).abs() < 1e-12);
        assert!((stat.standard_error - (5.0f64 / 3.0).sqrt() / 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_guarded_ratio() {
        assert_eq!(guarded_ratio(3.0, 2.0), 1.5);
        assert_eq!(guarded_ratio(3.0, 0.0), 0.0);
    }
}
