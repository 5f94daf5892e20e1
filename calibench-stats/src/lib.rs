#![warn(missing_docs)]
//! Calibench Statistical Engine
//!
//! Reduces a noisy set of per-operation durations to robust statistics:
//! - Tukey fence outlier removal (`±2.25·IQR`)
//! - Min / max / mean / coefficient of variation
//! - Sample variance and a Student's t 95% margin of error
//! - Nearest-rank percentiles over the filtered set

mod histogram;
mod outliers;
mod percentiles;
mod student_t;
mod summary;

pub use histogram::{Histogram, HistogramError};
pub use outliers::{
    FENCE_MULTIPLIER, MIN_SAMPLES_FOR_FENCE, OutlierFence, TUKEY_K, quartiles, remove_outliers,
    tukey_fence,
};
pub use percentiles::{nearest_rank, nearest_rank_index};
pub use student_t::{NORMAL_CRITICAL_95, t_critical_95};
pub use summary::{Summary, compute_summary};

/// Confidence level of the reported margin of error
pub const CONFIDENCE_LEVEL: f64 = 0.95;
