//! Summary Statistics
//!
//! Everything here is computed from the retained (outlier-filtered) samples:
//! - Extremes and mean
//! - Population coefficient of variation
//! - Sample variance, standard error and a Student's t margin of error

use crate::student_t::t_critical_95;
use serde::{Deserialize, Serialize};

/// Summary of a filtered sample set
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// Smallest retained sample
    pub min: f64,
    /// Largest retained sample
    pub max: f64,
    /// Arithmetic mean
    pub mean: f64,
    /// Sample variance (n - 1 denominator)
    pub variance: f64,
    /// Sample standard deviation
    pub std_dev: f64,
    /// Population standard deviation divided by the mean
    pub cv: f64,
    /// Standard error of the mean
    pub sem: f64,
    /// Absolute 95% margin of error (`sem * t`)
    pub margin_of_error: f64,
    /// Margin of error as a percentage of the mean
    pub relative_error: f64,
    /// Number of retained samples
    pub sample_count: usize,
}

/// Compute the summary of a sample set.
///
/// An empty slice yields an all-zero summary.
pub fn compute_summary(samples: &[f64]) -> Summary {
    let n = samples.len();
    if n == 0 {
        return Summary::default();
    }

    let min = samples.iter().copied().fold(f64::INFINITY, f64::min);
    let max = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let mean = samples.iter().sum::<f64>() / n as f64;

    if n == 1 {
        return Summary {
            min,
            max,
            mean,
            sample_count: 1,
            ..Summary::default()
        };
    }

    let squared_deviations: f64 = samples.iter().map(|x| (x - mean).powi(2)).sum();

    let population_std_dev = (squared_deviations / n as f64).sqrt();
    let variance = squared_deviations / (n - 1) as f64;
    let std_dev = variance.sqrt();
    let sem = std_dev / (n as f64).sqrt();
    let margin_of_error = sem * t_critical_95(n - 1);

    let (cv, relative_error) = if mean == 0.0 {
        (0.0, 0.0)
    } else {
        (population_std_dev / mean, margin_of_error / mean * 100.0)
    };

    Summary {
        min,
        max,
        mean,
        variance,
        std_dev,
        cv,
        sem,
        margin_of_error,
        relative_error,
        sample_count: n,
    }
}
