#![warn(missing_docs)]
//! Calibench Core - Measurement Runtime
//!
//! This crate calibrates and samples a single benchmark:
//! - Monotonic nanosecond [`Clock`] with a measured resolution
//! - [`Work`] in four timing modes (sync/async, self-timed/externally-timed)
//! - [`ManagedTimer`] for work that brackets its own measured region
//! - [`Calibration`] lifecycle and [`run_benchmark`] driver

mod benchmark;
mod clock;
mod error;
mod lifecycle;
mod measure;
mod timer;
mod work;

pub use benchmark::{
    BenchOptions, Benchmark, DEFAULT_MAX_TIME, DEFAULT_MIN_TIME, MAX_TIMER_ERROR,
    default_min_time,
};
pub use clock::clock_benchmark;
pub use error::{BenchError, TimerError};
pub use lifecycle::{
    BenchmarkResult, Calibration, CycleSample, MAX_RECOMMENDED_ITERATIONS, MIN_ITERATIONS, Phase,
    SEED_ITERATIONS, iterations_for_op_duration, round_ops_per_sec, run_benchmark,
    run_benchmark_with,
};
pub use measure::{Clock, NANOS_PER_SEC, Stopwatch, format_duration, now, resolution};
pub use timer::ManagedTimer;
pub use work::{AsyncDriver, TimingMode, Work, WorkFuture, WorkOutcome, WorkResult};

pub use calibench_stats::{Histogram, HistogramError};
