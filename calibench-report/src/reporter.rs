//! Reporter events

use calibench_core::{Benchmark, BenchmarkResult, CycleSample};
use std::io;

/// Receives events from a suite run, in order:
/// `on_start`, then per benchmark any number of `on_cycle` followed by one
/// `on_result`, then `on_complete`.
pub trait Reporter {
    /// A suite named `suite` is about to run `count` benchmarks
    fn on_start(&mut self, suite: &str, count: usize) -> io::Result<()> {
        let _ = (suite, count);
        Ok(())
    }

    /// One sampled cycle of `benchmark` finished
    fn on_cycle(&mut self, benchmark: &str, sample: &CycleSample) -> io::Result<()> {
        let _ = (benchmark, sample);
        Ok(())
    }

    /// `benchmark` finished with `result`
    fn on_result(&mut self, benchmark: &Benchmark, result: &BenchmarkResult) -> io::Result<()>;

    /// Every benchmark finished
    fn on_complete(&mut self, results: &[BenchmarkResult]) -> io::Result<()> {
        let _ = results;
        Ok(())
    }
}

impl<F> Reporter for F
where
    F: FnMut(&Benchmark, &BenchmarkResult),
{
    fn on_result(&mut self, benchmark: &Benchmark, result: &BenchmarkResult) -> io::Result<()> {
        self(benchmark, result);
        Ok(())
    }
}
