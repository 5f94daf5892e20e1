//! Percentile Computation
//!
//! Nearest-rank percentiles over an already sorted, outlier-filtered sample
//! set. No interpolation: the result is always one of the recorded samples.

/// Sorted index holding the `percentile`-th nearest-rank sample.
///
/// The rank is `ceil(n * p / 100) - 1`. A rank of `-1` (p = 0, or a p small
/// enough that `n * p / 100` rounds up to zero) clamps to the first sample.
pub fn nearest_rank_index(len: usize, percentile: f64) -> Option<usize> {
    if len == 0 {
        return None;
    }

    let rank = (len as f64 * percentile / 100.0).ceil() as usize;
    Some(rank.saturating_sub(1).min(len - 1))
}

/// Nearest-rank percentile of an ascending slice
///
/// # Examples
///
/// ```
/// # use calibench_stats::nearest_rank;
/// let samples = [1.0, 2.0, 3.0, 4.0];
/// assert_eq!(nearest_rank(&samples, 50.0), Some(2.0));
/// assert_eq!(nearest_rank(&samples, 100.0), Some(4.0));
/// ```
pub fn nearest_rank(sorted: &[f64], percentile: f64) -> Option<f64> {
    nearest_rank_index(sorted.len(), percentile).map(|i| sorted[i])
}
