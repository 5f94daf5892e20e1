//! Benchmark Definition
//!
//! A named unit of work plus the time budget that governs its calibration.

use crate::error::BenchError;
use crate::measure::{Clock, NANOS_PER_SEC};
use crate::work::{AsyncDriver, TimingMode, Work};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default minimum span of one cycle, in seconds
pub const DEFAULT_MIN_TIME: f64 = 0.05;

/// Default total sampling budget, in seconds
pub const DEFAULT_MAX_TIME: f64 = 0.5;

/// Relative error the clock resolution may contribute to one cycle
pub const MAX_TIMER_ERROR: f64 = 0.01;

/// Smallest cycle span that keeps clock granularity under [`MAX_TIMER_ERROR`],
/// never shorter than [`DEFAULT_MIN_TIME`].
pub fn default_min_time() -> f64 {
    (Clock::resolution() / 2.0 / MAX_TIMER_ERROR).max(DEFAULT_MIN_TIME)
}

/// Time budget for one benchmark
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BenchOptions {
    /// Minimum span of a single cycle, in seconds
    pub min_time: f64,
    /// Total sampling budget, in seconds (per repetition)
    pub max_time: f64,
    /// Multiplier applied to `max_time`
    pub repetitions: Option<u32>,
}

impl Default for BenchOptions {
    fn default() -> Self {
        Self {
            min_time: default_min_time(),
            max_time: DEFAULT_MAX_TIME,
            repetitions: None,
        }
    }
}

impl BenchOptions {
    /// Set the minimum cycle span
    pub fn with_min_time(mut self, min_time: Duration) -> Self {
        self.min_time = min_time.as_secs_f64();
        self
    }

    /// Set the sampling budget
    pub fn with_max_time(mut self, max_time: Duration) -> Self {
        self.max_time = max_time.as_secs_f64();
        self
    }

    /// Set the budget multiplier
    pub fn with_repetitions(mut self, repetitions: u32) -> Self {
        self.repetitions = Some(repetitions);
        self
    }

    /// Reject budgets the calibrator cannot honour
    pub fn validate(&self) -> Result<(), BenchError> {
        let resolution = Clock::resolution();

        for (field, value) in [("min_time", self.min_time), ("max_time", self.max_time)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(BenchError::invalid(
                    field,
                    format!("must be a positive number of seconds, got {value}"),
                ));
            }
            if value < resolution {
                return Err(BenchError::invalid(
                    field,
                    format!("{value}s is below the clock resolution of {resolution}s"),
                ));
            }
        }

        if self.repetitions == Some(0) {
            return Err(BenchError::invalid("repetitions", "must be at least 1"));
        }

        Ok(())
    }

    /// Total sampling budget in nanoseconds, repetitions included
    pub fn budget_ns(&self) -> u64 {
        let repetitions = self.repetitions.unwrap_or(1) as f64;
        (self.max_time * repetitions * NANOS_PER_SEC) as u64
    }
}

/// A named, validated unit of work
#[derive(Debug)]
pub struct Benchmark {
    name: String,
    options: BenchOptions,
    work: Work,
    driver: AsyncDriver,
}

impl Benchmark {
    /// Create a benchmark with default options
    pub fn new(name: impl Into<String>, work: Work) -> Result<Self, BenchError> {
        Self::with_options(name, BenchOptions::default(), work)
    }

    /// Create a benchmark with explicit options
    pub fn with_options(
        name: impl Into<String>,
        options: BenchOptions,
        work: Work,
    ) -> Result<Self, BenchError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(BenchError::invalid("name", "must be a non-empty string"));
        }
        options.validate()?;

        Ok(Self {
            name,
            options,
            work,
            driver: AsyncDriver::new(),
        })
    }

    /// Benchmark name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Time budget
    pub fn options(&self) -> &BenchOptions {
        &self.options
    }

    /// Minimum cycle span, in seconds
    pub fn min_time(&self) -> f64 {
        self.options.min_time
    }

    /// Sampling budget, in seconds
    pub fn max_time(&self) -> f64 {
        self.options.max_time
    }

    /// Budget multiplier
    pub fn repetitions(&self) -> Option<u32> {
        self.options.repetitions
    }

    /// Timing mode of the underlying work
    pub fn mode(&self) -> TimingMode {
        self.work.mode()
    }

    pub(crate) fn parts_mut(&mut self) -> (&mut Work, &mut AsyncDriver) {
        (&mut self.work, &mut self.driver)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = BenchOptions::default();
        assert!(options.min_time >= DEFAULT_MIN_TIME);
        assert_eq!(options.max_time, DEFAULT_MAX_TIME);
        assert_eq!(options.repetitions, None);
        assert_eq!(options.budget_ns(), 500_000_000);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_repetitions_scale_budget() {
        let options = BenchOptions::default().with_repetitions(3);
        assert_eq!(options.budget_ns(), 1_500_000_000);
    }

    #[test]
    fn test_rejects_non_positive_times() {
        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let options = BenchOptions {
                min_time: bad,
                ..BenchOptions::default()
            };
            assert!(matches!(
                options.validate(),
                Err(BenchError::InvalidOption { field: "min_time", .. })
            ));

            let options = BenchOptions {
                max_time: bad,
                ..BenchOptions::default()
            };
            assert!(matches!(
                options.validate(),
                Err(BenchError::InvalidOption { field: "max_time", .. })
            ));
        }
    }

    #[test]
    fn test_rejects_below_resolution() {
        let options = BenchOptions {
            max_time: Clock::resolution() / 2.0,
            ..BenchOptions::default()
        };
        assert!(options.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_repetitions() {
        let options = BenchOptions::default().with_repetitions(0);
        assert!(matches!(
            options.validate(),
            Err(BenchError::InvalidOption { field: "repetitions", .. })
        ));
    }

    #[test]
    fn test_duration_builders() {
        let options = BenchOptions::default()
            .with_min_time(Duration::from_millis(10))
            .with_max_time(Duration::from_millis(200));
        assert!((options.min_time - 0.01).abs() < 1e-12);
        assert!((options.max_time - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_benchmark_requires_name() {
        let err = Benchmark::new("  ", Work::sync(|| ())).unwrap_err();
        assert!(matches!(err, BenchError::InvalidOption { field: "name", .. }));

        let bench = Benchmark::new("noop", Work::sync(|| ())).unwrap();
        assert_eq!(bench.name(), "noop");
        assert_eq!(bench.mode(), TimingMode::SelfTimed);
    }
}
