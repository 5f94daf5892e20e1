//! Error types

use crate::lifecycle::Phase;
use calibench_stats::HistogramError;
use thiserror::Error;

/// Misuse of an externally-timed [`ManagedTimer`](crate::ManagedTimer)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TimerError {
    #[error("You forgot to call .end(count)")]
    MissingEnd,

    #[error("You forgot to call .start()")]
    MissingStart,

    #[error(".end(count) was called before .start()")]
    EndBeforeStart,

    #[error("Iteration count must be a positive integer, got {0}")]
    InvalidIterations(u64),
}

/// Errors that abort a benchmark run
#[derive(Debug, Error)]
pub enum BenchError {
    #[error("Timer error: {0}")]
    Timer(#[from] TimerError),

    #[error("Histogram error: {0}")]
    Histogram(#[from] HistogramError),

    #[error("Benchmark work failed: {0:#}")]
    Work(anyhow::Error),

    #[error("Invalid option `{field}`: {reason}")]
    InvalidOption {
        field: &'static str,
        reason: String,
    },

    #[error("Calibration is in phase {actual:?}, expected {expected:?}")]
    Phase { expected: Phase, actual: Phase },

    #[error("Async work needs a multi-threaded tokio runtime or none at all")]
    UnsupportedRuntime,

    #[error("Failed to build async runtime: {0}")]
    Runtime(#[from] std::io::Error),
}

impl BenchError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        BenchError::InvalidOption {
            field,
            reason: reason.into(),
        }
    }
}
