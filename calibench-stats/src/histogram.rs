//! Statistical Histogram
//!
//! Append-only recorder of per-operation durations. Statistics exist only
//! after [`Histogram::finish`] seals the sample set; reading them earlier, or
//! recording afterwards, is a usage error rather than a silent default.

use crate::outliers::{OutlierFence, remove_outliers};
use crate::percentiles::nearest_rank;
use crate::summary::{Summary, compute_summary};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Histogram usage and validation errors
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum HistogramError {
    #[error("Histogram is already finished")]
    AlreadySealed,

    #[error("Histogram is not finished; call finish() first")]
    NotFinished,

    #[error("Percentile must be within 0..=100, got {0}")]
    InvalidPercentile(f64),

    #[error("Sample must be a finite non-negative number, got {0}")]
    InvalidSample(f64),

    #[error("Histogram has no retained samples")]
    Empty,
}

/// State computed once when the histogram is sealed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Sealed {
    summary: Summary,
    fence: Option<OutlierFence>,
    outliers: usize,
}

/// Sample recorder with outlier-filtered statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    samples: Vec<f64>,
    sealed: Option<Sealed>,
}

impl Histogram {
    /// Create an empty, unsealed histogram
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a histogram with room for `capacity` samples
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            samples: Vec::with_capacity(capacity),
            sealed: None,
        }
    }

    /// Append a sample
    pub fn record(&mut self, value: f64) -> Result<(), HistogramError> {
        if self.sealed.is_some() {
            return Err(HistogramError::AlreadySealed);
        }
        if !value.is_finite() || value < 0.0 {
            return Err(HistogramError::InvalidSample(value));
        }

        self.samples.push(value);
        Ok(())
    }

    /// Seal the histogram: sort, drop outliers and compute the summary.
    ///
    /// May be called exactly once.
    pub fn finish(&mut self) -> Result<(), HistogramError> {
        if self.sealed.is_some() {
            return Err(HistogramError::AlreadySealed);
        }

        let mut sorted = std::mem::take(&mut self.samples);
        sorted.sort_by(f64::total_cmp);
        let recorded = sorted.len();

        let (retained, fence) = remove_outliers(sorted);
        let summary = compute_summary(&retained);

        self.sealed = Some(Sealed {
            summary,
            fence,
            outliers: recorded - retained.len(),
        });
        self.samples = retained;

        Ok(())
    }

    /// Whether [`finish`](Self::finish) has been called
    pub fn is_finished(&self) -> bool {
        self.sealed.is_some()
    }

    fn sealed(&self) -> Result<&Sealed, HistogramError> {
        self.sealed.as_ref().ok_or(HistogramError::NotFinished)
    }

    /// Full summary of the retained samples
    pub fn summary(&self) -> Result<&Summary, HistogramError> {
        self.sealed().map(|s| &s.summary)
    }

    /// Smallest retained sample
    pub fn min(&self) -> Result<f64, HistogramError> {
        self.summary().map(|s| s.min)
    }

    /// Largest retained sample
    pub fn max(&self) -> Result<f64, HistogramError> {
        self.summary().map(|s| s.max)
    }

    /// Mean of the retained samples
    pub fn mean(&self) -> Result<f64, HistogramError> {
        self.summary().map(|s| s.mean)
    }

    /// Sample variance of the retained samples
    pub fn variance(&self) -> Result<f64, HistogramError> {
        self.summary().map(|s| s.variance)
    }

    /// Sample standard deviation of the retained samples
    pub fn std_dev(&self) -> Result<f64, HistogramError> {
        self.summary().map(|s| s.std_dev)
    }

    /// Coefficient of variation (population stddev / mean)
    pub fn cv(&self) -> Result<f64, HistogramError> {
        self.summary().map(|s| s.cv)
    }

    /// Relative 95% margin of error, in percent of the mean
    pub fn error(&self) -> Result<f64, HistogramError> {
        self.summary().map(|s| s.relative_error)
    }

    /// Absolute 95% margin of error, in sample units
    pub fn margin_of_error(&self) -> Result<f64, HistogramError> {
        self.summary().map(|s| s.margin_of_error)
    }

    /// Number of retained samples
    pub fn samples(&self) -> Result<usize, HistogramError> {
        self.summary().map(|s| s.sample_count)
    }

    /// Number of samples rejected by the outlier fence
    pub fn outliers(&self) -> Result<usize, HistogramError> {
        self.sealed().map(|s| s.outliers)
    }

    /// Fence applied while sealing (`None` when too few samples were recorded)
    pub fn fence(&self) -> Result<Option<OutlierFence>, HistogramError> {
        self.sealed().map(|s| s.fence)
    }

    /// Retained samples in ascending order
    pub fn values(&self) -> Result<&[f64], HistogramError> {
        self.sealed()?;
        Ok(&self.samples)
    }

    /// Number of samples recorded so far (before sealing) or retained (after)
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether no samples are held
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Nearest-rank percentile of the retained samples.
    ///
    /// `percentile(0)` clamps to the minimum; `percentile(100)` is the maximum.
    pub fn percentile(&self, percentile: f64) -> Result<f64, HistogramError> {
        self.sealed()?;
        if !(0.0..=100.0).contains(&percentile) {
            return Err(HistogramError::InvalidPercentile(percentile));
        }

        nearest_rank(&self.samples, percentile).ok_or(HistogramError::Empty)
    }
}
