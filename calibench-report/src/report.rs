//! Report Data Structures

use calibench_core::{BenchmarkResult, HistogramError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Complete suite report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub meta: ReportMeta,
    pub suite: String,
    pub results: Vec<ReportEntry>,
}

/// Report metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMeta {
    pub version: String,
    pub timestamp: DateTime<Utc>,
}

impl ReportMeta {
    /// Metadata stamped with the current time and crate version
    pub fn now() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Flattened statistics for one benchmark; all durations are per operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportEntry {
    pub name: String,
    pub ops_sec: f64,
    pub iterations: u64,
    pub cycles: usize,
    pub samples: usize,
    pub outliers: usize,
    pub min_ns: f64,
    pub max_ns: f64,
    pub mean_ns: f64,
    pub std_dev_ns: f64,
    pub cv: f64,
    /// 95% margin of error, percent of the mean
    pub error_pct: f64,
    pub p50_ns: f64,
    pub p75_ns: f64,
    pub p99_ns: f64,
}

impl ReportEntry {
    /// Flatten a result whose histogram is sealed
    pub fn from_result(result: &BenchmarkResult) -> Result<Self, HistogramError> {
        let histogram = &result.histogram;
        let summary = histogram.summary()?;

        Ok(Self {
            name: result.name.clone(),
            ops_sec: result.ops_sec,
            iterations: result.iterations,
            cycles: result.cycles,
            samples: summary.sample_count,
            outliers: histogram.outliers()?,
            min_ns: summary.min,
            max_ns: summary.max,
            mean_ns: summary.mean,
            std_dev_ns: summary.std_dev,
            cv: summary.cv,
            error_pct: summary.relative_error,
            p50_ns: histogram.percentile(50.0)?,
            p75_ns: histogram.percentile(75.0)?,
            p99_ns: histogram.percentile(99.0)?,
        })
    }
}
