//! Outlier Removal
//!
//! Tukey fences over the interquartile range. Quartiles use the "linear
//! interpolation between closest ranks" rule: when `(n - 1) / 4` or `n / 4`
//! is whole, the two bracketing order statistics are averaged, otherwise the
//! single nearest order statistic is taken.
//!
//! The fence is `[Q1 - k·IQR, Q3 + k·IQR]` with `k = 1.5 × 1.5 = 2.25`.
//! Unlike tail-latency tooling, rejected samples are dropped from every
//! derived statistic, percentiles included.

use serde::{Deserialize, Serialize};

/// Base Tukey multiplier.
pub const TUKEY_K: f64 = 1.5;

/// Effective fence multiplier (the base multiplier applied twice).
pub const FENCE_MULTIPLIER: f64 = TUKEY_K * TUKEY_K;

/// Samples required before quartiles are meaningful.
pub const MIN_SAMPLES_FOR_FENCE: usize = 4;

/// Quartiles and fence bounds computed from a sorted sample set
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutlierFence {
    /// First quartile
    pub q1: f64,
    /// Third quartile
    pub q3: f64,
    /// Inclusive lower bound
    pub lower: f64,
    /// Inclusive upper bound
    pub upper: f64,
}

impl OutlierFence {
    /// Interquartile range
    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }

    /// Whether a value lies inside the (inclusive) fence
    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value <= self.upper
    }
}

/// Compute Q1 and Q3 of an ascending slice.
///
/// Returns `None` below [`MIN_SAMPLES_FOR_FENCE`] samples.
pub fn quartiles(sorted: &[f64]) -> Option<(f64, f64)> {
    let n = sorted.len();
    if n < MIN_SAMPLES_FOR_FENCE {
        return None;
    }

    let q1_rank = n / 4;
    let q3_rank = (3 * n).div_ceil(4);

    if (n - 1) % 4 == 0 || n % 4 == 0 {
        let q1 = 0.5 * (sorted[q1_rank - 1] + sorted[q1_rank]);
        let q3 = 0.5 * (sorted[q3_rank - 1] + sorted[q3_rank]);
        Some((q1, q3))
    } else {
        Some((sorted[q1_rank], sorted[(3 * n) / 4]))
    }
}

/// Build the outlier fence for an ascending slice
pub fn tukey_fence(sorted: &[f64]) -> Option<OutlierFence> {
    let (q1, q3) = quartiles(sorted)?;
    let iqr = q3 - q1;

    Some(OutlierFence {
        q1,
        q3,
        lower: q1 - FENCE_MULTIPLIER * iqr,
        upper: q3 + FENCE_MULTIPLIER * iqr,
    })
}

/// Drop samples outside the Tukey fence.
///
/// `sorted` must be ascending; order is preserved. Returns the retained
/// samples and the fence that was applied, if any.
pub fn remove_outliers(sorted: Vec<f64>) -> (Vec<f64>, Option<OutlierFence>) {
    match tukey_fence(&sorted) {
        Some(fence) => {
            let retained = sorted.into_iter().filter(|&v| fence.contains(v)).collect();
            (retained, Some(fence))
        }
        None => (sorted, None),
    }
}
