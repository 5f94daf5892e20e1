#![warn(missing_docs)]
//! # Calibench
//!
//! Adaptive statistical micro-benchmarking for Rust.
//!
//! Calibench measures the wall-clock cost of a unit of work with almost no
//! configuration:
//! - **Calibration**: a short probe picks how many iterations make one cycle
//!   span at least `min_time`, and the count keeps adapting cycle by cycle
//! - **Budgeted sampling**: cycles repeat until `max_time` (× repetitions) is spent
//! - **Robust statistics**: Tukey-fence outlier removal, mean, coefficient of
//!   variation, Student's t margin of error and nearest-rank percentiles
//! - **Four timing modes**: sync or async work, timed by the harness or by the
//!   work itself through a [`ManagedTimer`]
//!
//! ## Quick Start
//!
//! ```no_run
//! use calibench::prelude::*;
//!
//! fn main() -> Result<(), SuiteError> {
//!     let mut suite = Suite::new("strings");
//!     suite.add(
//!         "concat",
//!         Work::sync(|| {
//!             std::hint::black_box(format!("{}{}", "a", "b"));
//!         }),
//!     )?;
//!     suite.run()?;
//!     Ok(())
//! }
//! ```
//!
//! ## Externally-Timed Work
//!
//! ```no_run
//! use calibench::prelude::*;
//!
//! # fn main() -> Result<(), SuiteError> {
//! let mut suite = Suite::new("vec");
//! suite.add(
//!     "push",
//!     Work::managed(|timer: &ManagedTimer| {
//!         let mut v = Vec::with_capacity(timer.count() as usize);
//!         timer.start();
//!         for i in 0..timer.count() {
//!             v.push(i);
//!         }
//!         timer.end(timer.count())
//!     }),
//! )?;
//! suite.run()?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Async Work
//!
//! ```no_run
//! use calibench::prelude::*;
//! use std::time::Duration;
//!
//! # fn main() -> Result<(), SuiteError> {
//! let mut suite = Suite::new("timers");
//! suite.add(
//!     "sleep-1ms",
//!     Work::future(|| tokio::time::sleep(Duration::from_millis(1))),
//! )?;
//! suite.run()?;
//! # Ok(())
//! # }
//! ```

// Re-export core types
pub use calibench_core::{
    AsyncDriver, BenchError, BenchOptions, Benchmark, BenchmarkResult, Calibration, Clock,
    CycleSample, DEFAULT_MAX_TIME, DEFAULT_MIN_TIME, ManagedTimer, Phase, Stopwatch, TimerError,
    TimingMode, Work, WorkOutcome, clock_benchmark, default_min_time, format_duration,
    run_benchmark, run_benchmark_with,
};

// Re-export stats
pub use calibench_stats::{Histogram, HistogramError, OutlierFence, Summary};

// Re-export reporting
pub use calibench_report::{
    ConsoleReporter, JsonReporter, OutputFormat, Report, ReportEntry, Reporter, format_number,
    format_result_line,
};

// Re-export runner
pub use calibench_runner::{CalibenchConfig, Suite, SuiteError, init_tracing};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        BenchOptions, Benchmark, BenchmarkResult, ManagedTimer, Reporter, Suite, SuiteError,
        Work,
    };
}
