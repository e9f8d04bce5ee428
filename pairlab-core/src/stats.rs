//! Summary statistics and Pearson correlation.
//!
//! Pure functions over immutable inputs. Every undefined result is reported
//! as a [`StatsError`] instead of leaking a NaN.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::data::align::AlignedTable;

/// Which column of an aligned pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Leg {
    First,
    Second,
}

impl fmt::Display for Leg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Leg::First => f.write_str("first series"),
            Leg::Second => f.write_str("second series"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum StatsError {
    #[error("insufficient data: {what} needs at least {needed} points, got {found}")]
    InsufficientData {
        what: &'static str,
        needed: usize,
        found: usize,
    },

    #[error("correlation undefined: {leg} has zero variance")]
    ZeroVariance { leg: Leg },

    #[error("value at index {index} is not finite")]
    NonFiniteValue { index: usize },

    #[error("columns differ in length: {first} vs {second}")]
    LengthMismatch { first: usize, second: usize },

    #[error("{what} is outside the representable range")]
    Overflow { what: &'static str },
}

/// Mean, sample standard deviation (N−1), minimum and maximum.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    pub count: usize,
    pub mean: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
}

/// Summarize a sequence of prices.
///
/// Requires at least two values because the sample standard deviation is
/// undefined below that. Values are sorted before accumulating, so any
/// permutation of the input produces bit-identical results. Accumulation
/// runs on values divided by the largest magnitude, so closes near
/// `f64::MAX` do not overflow the intermediate sums.
pub fn summarize(values: &[f64]) -> Result<SummaryStats, StatsError> {
    if values.len() < 2 {
        return Err(StatsError::InsufficientData {
            what: "summary statistics",
            needed: 2,
            found: values.len(),
        });
    }
    if let Some(index) = values.iter().position(|v| !v.is_finite()) {
        return Err(StatsError::NonFiniteValue { index });
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let scale = max_abs(&sorted);
    let unit: Vec<f64> = sorted.iter().map(|v| v / scale).collect();
    let n = unit.len() as f64;
    let unit_mean = unit.iter().sum::<f64>() / n;
    let unit_var = unit.iter().map(|v| (v - unit_mean).powi(2)).sum::<f64>() / (n - 1.0);

    let mean = unit_mean * scale;
    let std_dev = unit_var.sqrt() * scale;
    if !mean.is_finite() {
        return Err(StatsError::Overflow { what: "mean" });
    }
    if !std_dev.is_finite() {
        return Err(StatsError::Overflow {
            what: "standard deviation",
        });
    }

    Ok(SummaryStats {
        count: sorted.len(),
        mean,
        std_dev,
        min: sorted[0],
        max: sorted[sorted.len() - 1],
    })
}

/// Pearson product-moment correlation between the two columns of `table`.
pub fn correlation(table: &AlignedTable) -> Result<f64, StatsError> {
    pearson(&table.first_prices(), &table.second_prices())
}

/// Pearson correlation of two equal-length slices.
///
/// A constant column makes the coefficient undefined; that is detected
/// exactly (all values equal) rather than by comparing a rounded variance
/// against zero. Each column is divided by its largest magnitude first; the
/// coefficient is scale-free, and the squared deviations stay finite.
pub fn pearson(xs: &[f64], ys: &[f64]) -> Result<f64, StatsError> {
    if xs.len() != ys.len() {
        return Err(StatsError::LengthMismatch {
            first: xs.len(),
            second: ys.len(),
        });
    }
    let n = xs.len();
    if n < 2 {
        return Err(StatsError::InsufficientData {
            what: "correlation",
            needed: 2,
            found: n,
        });
    }
    if let Some(index) = xs.iter().chain(ys).position(|v| !v.is_finite()) {
        return Err(StatsError::NonFiniteValue { index: index % n });
    }
    if is_constant(xs) {
        return Err(StatsError::ZeroVariance { leg: Leg::First });
    }
    if is_constant(ys) {
        return Err(StatsError::ZeroVariance { leg: Leg::Second });
    }

    let (sx, sy) = (max_abs(xs), max_abs(ys));
    let mean_x = xs.iter().map(|x| x / sx).sum::<f64>() / n as f64;
    let mean_y = ys.iter().map(|y| y / sy).sum::<f64>() / n as f64;

    let (mut cov, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
    for (x, y) in xs.iter().zip(ys) {
        let dx = x / sx - mean_x;
        let dy = y / sy - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    let r = cov / (var_x.sqrt() * var_y.sqrt());
    if !r.is_finite() {
        return Err(StatsError::Overflow {
            what: "correlation",
        });
    }
    Ok(r.clamp(-1.0, 1.0))
}

/// Largest magnitude, or 1 for an all-zero column.
fn max_abs(values: &[f64]) -> f64 {
    let m = values.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()));
    if m > 0.0 {
        m
    } else {
        1.0
    }
}

fn is_constant(values: &[f64]) -> bool {
    values.windows(2).all(|w| w[0] == w[1])
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    #[test]
    fn summarize_known_values() {
        let s = summarize(&[100.0, 102.0, 101.0]).unwrap();
        assert_eq!(s.count, 3);
        assert!((s.mean - 101.0).abs() < EPS);
        assert!((s.std_dev - 1.0).abs() < EPS);
        assert_eq!(s.min, 100.0);
        assert_eq!(s.max, 102.0);
    }

    #[test]
    fn summarize_uses_sample_denominator() {
        // population std of [2,4,4,4,5,5,7,9] is 2.0; sample std is sqrt(32/7)
        let s = summarize(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert!((s.std_dev - (32.0_f64 / 7.0).sqrt()).abs() < EPS);
    }

    #[test]
    fn summarize_rejects_short_input() {
        assert_eq!(
            summarize(&[]),
            Err(StatsError::InsufficientData {
                what: "summary statistics",
                needed: 2,
                found: 0
            })
        );
        assert!(matches!(
            summarize(&[1.0]),
            Err(StatsError::InsufficientData { found: 1, .. })
        ));
    }

    #[test]
    fn summarize_rejects_nan() {
        assert_eq!(
            summarize(&[1.0, f64::NAN, 2.0]),
            Err(StatsError::NonFiniteValue { index: 1 })
        );
    }

    #[test]
    fn summarize_constant_has_zero_std() {
        let s = summarize(&[5.0, 5.0, 5.0]).unwrap();
        assert_eq!(s.std_dev, 0.0);
    }

    #[test]
    fn pearson_perfect_positive_and_negative() {
        let xs = [1.0, 2.0, 3.0, 4.0];
        let up = [10.0, 20.0, 30.0, 40.0];
        let down = [-1.0, -2.0, -3.0, -4.0];
        assert!((pearson(&xs, &up).unwrap() - 1.0).abs() < EPS);
        assert!((pearson(&xs, &down).unwrap() + 1.0).abs() < EPS);
    }

    #[test]
    fn pearson_known_value() {
        // r = 0.8 for this textbook pair
        let xs = [1.0, 2.0, 3.0, 4.0, 5.0];
        let ys = [2.0, 1.0, 4.0, 3.0, 5.0];
        assert!((pearson(&xs, &ys).unwrap() - 0.8).abs() < EPS);
    }

    #[test]
    fn pearson_zero_variance_is_reported() {
        let xs = [3.0, 3.0, 3.0];
        let ys = [1.0, 2.0, 3.0];
        assert_eq!(
            pearson(&xs, &ys),
            Err(StatsError::ZeroVariance { leg: Leg::First })
        );
        assert_eq!(
            pearson(&ys, &xs),
            Err(StatsError::ZeroVariance { leg: Leg::Second })
        );
    }

    #[test]
    fn huge_magnitudes_do_not_overflow() {
        let r = pearson(&[1e200, 2e200, 3e200], &[1.0, 2.0, 3.0]).unwrap();
        assert!((r - 1.0).abs() < EPS);

        let s = summarize(&[1e308, 1e308, 1.0]).unwrap();
        assert!(s.mean.is_finite() && s.std_dev.is_finite());
        assert!((s.mean / 1e308 - 2.0 / 3.0).abs() < 1e-12);
        // sample std of [1, 1, 0] is sqrt(1/3)
        assert!((s.std_dev / 1e308 - (1.0_f64 / 3.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn std_beyond_f64_range_is_reported() {
        assert_eq!(
            summarize(&[-f64::MAX, f64::MAX]),
            Err(StatsError::Overflow {
                what: "standard deviation"
            })
        );
    }

    #[test]
    fn tiny_magnitudes_keep_their_correlation() {
        let r = pearson(&[1e-300, 2e-300, 4e-300], &[4.0, 2.0, 1.0]).unwrap();
        let expected = pearson(&[1.0, 2.0, 4.0], &[4.0, 2.0, 1.0]).unwrap();
        assert!((r - expected).abs() < 1e-12);
    }

    #[test]
    fn pearson_rejects_length_mismatch() {
        assert_eq!(
            pearson(&[1.0, 2.0, 3.0], &[1.0, 2.0]),
            Err(StatsError::LengthMismatch {
                first: 3,
                second: 2
            })
        );
    }

    #[test]
    fn pearson_needs_two_points() {
        assert!(matches!(
            pearson(&[1.0], &[2.0]),
            Err(StatsError::InsufficientData { found: 1, .. })
        ));
    }

    #[test]
    fn pearson_stays_in_range() {
        let xs: Vec<f64> = (0..500).map(|i| 1e6 + i as f64 * 1e-3).collect();
        let ys: Vec<f64> = xs.iter().map(|x| 3.0 * x + 7.0).collect();
        let r = pearson(&xs, &ys).unwrap();
        assert!((-1.0..=1.0).contains(&r));
        assert!((r - 1.0).abs() < 1e-9);
    }
}
