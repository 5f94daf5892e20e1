//! Calibration Lifecycle
//!
//! Decides how many iterations to run per cycle and how long to keep
//! sampling. A run moves through three phases:
//!
//! ```text
//!  Probing ──probe(10 iterations)──▶ Sampling ──budget spent──▶ Sealed
//!                                     │    ▲
//!                                     └────┘ cycle: record per-op time,
//!                                            re-derive iteration count
//! ```
//!
//! The recommended count is `max(10, round(min_time / per_op_seconds))`, so
//! each cycle is expected to span at least `min_time`. Only main-loop cycles
//! count against the `max_time` budget; the probe is free.

use crate::benchmark::{BenchOptions, Benchmark};
use crate::clock::clock_benchmark;
use crate::error::{BenchError, TimerError};
use crate::measure::{Clock, NANOS_PER_SEC, Stopwatch, format_duration};
use calibench_stats::Histogram;
use serde::{Deserialize, Serialize};

/// Iterations used by the initial probe
pub const SEED_ITERATIONS: u64 = 10;

/// Floor for every recommended iteration count
pub const MIN_ITERATIONS: u64 = 10;

/// Ceiling for recommended iteration counts (guards zero-duration probes)
pub const MAX_RECOMMENDED_ITERATIONS: u64 = 1_000_000_000;

/// Iterations needed for one cycle to span `min_time` seconds, given the
/// observed cost of one operation in nanoseconds.
pub fn iterations_for_op_duration(per_op_ns: f64, min_time: f64) -> u64 {
    if !per_op_ns.is_finite() || per_op_ns <= 0.0 {
        return MAX_RECOMMENDED_ITERATIONS;
    }

    let ops_for_min_time = min_time / (per_op_ns / NANOS_PER_SEC);
    (ops_for_min_time.round() as u64).clamp(MIN_ITERATIONS, MAX_RECOMMENDED_ITERATIONS)
}

/// Round throughput for display: two decimals below 100 ops/sec, none above
pub fn round_ops_per_sec(ops_sec: f64) -> f64 {
    if ops_sec < 100.0 {
        (ops_sec * 100.0).round() / 100.0
    } else {
        ops_sec.round()
    }
}

/// Calibration phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Waiting for the seed probe
    Probing,
    /// Running budgeted cycles
    Sampling,
    /// Histogram sealed, result produced
    Sealed,
}

/// One sampled cycle, as reported to observers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CycleSample {
    /// Zero-based cycle index (the probe is not counted)
    pub index: usize,
    /// Operations measured in this cycle
    pub iterations: u64,
    /// Measured duration of the cycle
    pub duration_ns: u64,
    /// `duration_ns / iterations`
    pub per_op_ns: f64,
    /// Iteration count recommended for the next cycle
    pub next_iterations: u64,
}

/// Result of one benchmark run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkResult {
    /// Benchmark name
    pub name: String,
    /// Aggregate throughput (total operations / total measured time)
    pub ops_sec: f64,
    /// Total operations measured across sampled cycles
    pub iterations: u64,
    /// Total measured time across sampled cycles
    pub total_time_ns: u64,
    /// Number of sampled cycles
    pub cycles: usize,
    /// Sealed per-operation duration histogram (nanoseconds)
    pub histogram: Histogram,
}

/// Per-run calibration state
#[derive(Debug)]
pub struct Calibration {
    phase: Phase,
    min_time: f64,
    budget_ns: u64,
    recommended: u64,
    bench_time_ns: u64,
    total_time_ns: u64,
    total_iterations: u64,
    cycles: usize,
    histogram: Histogram,
}

impl Calibration {
    /// Fresh state for a run governed by `options`
    pub fn new(options: &BenchOptions) -> Self {
        Self {
            phase: Phase::Probing,
            min_time: options.min_time,
            budget_ns: options.budget_ns(),
            recommended: SEED_ITERATIONS,
            bench_time_ns: 0,
            total_time_ns: 0,
            total_iterations: 0,
            cycles: 0,
            histogram: Histogram::new(),
        }
    }

    /// Current phase
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Iterations to run in the next cycle
    pub fn recommended_iterations(&self) -> u64 {
        self.recommended
    }

    /// Wall-clock time spent in sampled cycles so far
    pub fn bench_time_ns(&self) -> u64 {
        self.bench_time_ns
    }

    /// Operations measured in sampled cycles so far
    pub fn total_iterations(&self) -> u64 {
        self.total_iterations
    }

    fn expect_phase(&self, expected: Phase) -> Result<(), BenchError> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(BenchError::Phase {
                expected,
                actual: self.phase,
            })
        }
    }

    /// Feed the seed probe; returns the first recommended count
    pub fn observe_probe(&mut self, duration_ns: u64, iterations: u64) -> Result<u64, BenchError> {
        self.expect_phase(Phase::Probing)?;
        let (_, per_op_ns) = per_op(duration_ns, iterations)?;

        self.recommended = iterations_for_op_duration(per_op_ns, self.min_time);
        self.phase = Phase::Sampling;

        tracing::debug!(
            "Duration per operation on initial count: {}, recommending {} iterations",
            format_duration(per_op_ns),
            self.recommended
        );

        Ok(self.recommended)
    }

    /// Whether another cycle fits in the budget
    pub fn should_continue(&self) -> bool {
        self.phase == Phase::Sampling && self.bench_time_ns < self.budget_ns
    }

    /// Feed one sampled cycle.
    ///
    /// `wall_ns` is the harness-side span of the cycle and is what counts
    /// against the budget; `duration_ns` is the measured span, floored at the
    /// clock resolution.
    pub fn observe_cycle(
        &mut self,
        duration_ns: u64,
        iterations: u64,
        wall_ns: u64,
    ) -> Result<CycleSample, BenchError> {
        self.expect_phase(Phase::Sampling)?;
        let (duration_ns, per_op_ns) = per_op(duration_ns, iterations)?;

        self.histogram.record(per_op_ns)?;
        self.bench_time_ns = self.bench_time_ns.saturating_add(wall_ns);
        self.total_time_ns = self.total_time_ns.saturating_add(duration_ns);
        self.total_iterations = self.total_iterations.saturating_add(iterations);
        self.recommended = iterations_for_op_duration(per_op_ns, self.min_time);

        let sample = CycleSample {
            index: self.cycles,
            iterations,
            duration_ns,
            per_op_ns,
            next_iterations: self.recommended,
        };
        self.cycles += 1;

        Ok(sample)
    }

    /// Seal the histogram and produce the result
    pub fn finish(mut self, name: impl Into<String>) -> Result<BenchmarkResult, BenchError> {
        self.expect_phase(Phase::Sampling)?;
        self.histogram.finish()?;
        self.phase = Phase::Sealed;

        let ops_sec = self.total_iterations as f64 / (self.total_time_ns as f64 / NANOS_PER_SEC);

        Ok(BenchmarkResult {
            name: name.into(),
            ops_sec: round_ops_per_sec(ops_sec),
            iterations: self.total_iterations,
            total_time_ns: self.total_time_ns,
            cycles: self.cycles,
            histogram: self.histogram,
        })
    }
}

/// Span and per-operation cost of a cycle. Spans shorter than the clock
/// resolution are read as one resolution tick.
fn per_op(duration_ns: u64, iterations: u64) -> Result<(u64, f64), BenchError> {
    if iterations == 0 {
        return Err(TimerError::InvalidIterations(0).into());
    }
    let duration_ns = duration_ns.max(Clock::resolution_ns());
    Ok((duration_ns, duration_ns as f64 / iterations as f64))
}

/// Calibrate and sample `bench` until its budget is spent
pub fn run_benchmark(bench: &mut Benchmark) -> Result<BenchmarkResult, BenchError> {
    run_benchmark_with(bench, |_| {})
}

/// [`run_benchmark`], reporting every sampled cycle to `observer`
pub fn run_benchmark_with<F>(
    bench: &mut Benchmark,
    mut observer: F,
) -> Result<BenchmarkResult, BenchError>
where
    F: FnMut(&CycleSample),
{
    tracing::debug!(
        benchmark = bench.name(),
        "Starting with min_time={}, max_time={}, repetitions={:?}",
        bench.min_time(),
        bench.max_time(),
        bench.repetitions()
    );

    let mut calibration = Calibration::new(bench.options());

    let (duration_ns, iterations) = clock_benchmark(bench, SEED_ITERATIONS)?;
    calibration.observe_probe(duration_ns, iterations)?;

    while calibration.should_continue() {
        let watch = Stopwatch::start();
        let (duration_ns, iterations) =
            clock_benchmark(bench, calibration.recommended_iterations())?;
        let wall_ns = watch.elapsed_ns();

        let sample = calibration.observe_cycle(duration_ns, iterations, wall_ns)?;
        observer(&sample);
    }

    let result = calibration.finish(bench.name())?;

    tracing::debug!(
        benchmark = bench.name(),
        ops_sec = result.ops_sec,
        iterations = result.iterations,
        cycles = result.cycles,
        "Finished"
    );

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::work::Work;
    use std::time::Duration;

    fn options(min_time: f64, max_time: f64) -> BenchOptions {
        BenchOptions {
            min_time,
            max_time,
            repetitions: None,
        }
    }

    #[test]
    fn test_iteration_floor() {
        // 1 second per op: min_time is covered by a single op
        assert_eq!(iterations_for_op_duration(1e9, 0.05), MIN_ITERATIONS);
    }

    #[test]
    fn test_iterations_cover_min_time() {
        // 1µs per op, 50ms cycle => 50_000 iterations
        assert_eq!(iterations_for_op_duration(1_000.0, 0.05), 50_000);
        assert_eq!(iterations_for_op_duration(0.0, 0.05), MAX_RECOMMENDED_ITERATIONS);
    }

    #[test]
    fn test_probe_converges_for_fixed_cost() {
        for cost_ns in [250.0, 12_345.0, 4_000_000.0, 90_000_000.0] {
            let min_time = 0.05;
            let mut calibration = Calibration::new(&options(min_time, 0.5));
            let probe_ns = (cost_ns * SEED_ITERATIONS as f64) as u64;
            let count = calibration.observe_probe(probe_ns, SEED_ITERATIONS).unwrap();

            assert!(count >= MIN_ITERATIONS);
            let cycle_seconds = count as f64 * cost_ns / 1e9;
            // Allow half an iteration of rounding slack
            assert!(cycle_seconds + 0.5 * cost_ns / 1e9 >= min_time);
            assert_eq!(calibration.phase(), Phase::Sampling);
        }
    }

    #[test]
    fn test_budget_accounting() {
        let mut calibration = Calibration::new(&options(0.05, 0.5));
        calibration.observe_probe(1_000_000, 10).unwrap();
        assert!(calibration.should_continue());

        calibration.observe_cycle(300_000_000, 3_000, 300_000_000).unwrap();
        assert!(calibration.should_continue());
        calibration.observe_cycle(250_000_000, 2_500, 260_000_000).unwrap();
        assert!(!calibration.should_continue());

        let result = calibration.finish("budget").unwrap();
        assert_eq!(result.iterations, 5_500);
        assert_eq!(result.cycles, 2);
        assert_eq!(result.total_time_ns, 550_000_000);
        assert_eq!(result.ops_sec, 10_000.0);
        assert_eq!(result.histogram.samples().unwrap(), 2);
    }

    #[test]
    fn test_cycle_adapts_recommendation() {
        let mut calibration = Calibration::new(&options(0.05, 0.5));
        calibration.observe_probe(10_000, 10).unwrap();
        assert_eq!(calibration.recommended_iterations(), 50_000);

        // Work became 10x slower after warm-up
        let sample = calibration
            .observe_cycle(500_000_000, 50_000, 500_000_000)
            .unwrap();
        assert_eq!(sample.per_op_ns, 10_000.0);
        assert_eq!(sample.next_iterations, 5_000);
        assert_eq!(calibration.recommended_iterations(), 5_000);
    }

    #[test]
    fn test_phase_errors() {
        let mut calibration = Calibration::new(&options(0.05, 0.5));
        assert!(matches!(
            calibration.observe_cycle(1, 1, 1),
            Err(BenchError::Phase {
                expected: Phase::Sampling,
                actual: Phase::Probing
            })
        ));

        calibration.observe_probe(100, 10).unwrap();
        assert!(matches!(
            calibration.observe_probe(100, 10),
            Err(BenchError::Phase { .. })
        ));
    }

    #[test]
    fn test_zero_span_cycles_stay_finite() {
        let mut calibration = Calibration::new(&options(0.05, 0.5));
        calibration.observe_probe(0, 10).unwrap();
        let sample = calibration.observe_cycle(0, 100, 1_000_000_000).unwrap();
        assert_eq!(sample.duration_ns, Clock::resolution_ns());

        let result = calibration.finish("zero").unwrap();
        assert_eq!(result.total_time_ns, Clock::resolution_ns());
        assert!(result.ops_sec.is_finite());

        let expected = 100.0 / (Clock::resolution_ns() as f64 / 1e9);
        let mean_per_op = result.histogram.mean().unwrap();
        assert!((1e9 / mean_per_op - expected).abs() <= expected * 1e-9);
    }

    #[test]
    fn test_zero_iterations_rejected() {
        let mut calibration = Calibration::new(&options(0.05, 0.5));
        assert!(calibration.observe_probe(100, 0).is_err());
    }

    #[test]
    fn test_ops_rounding() {
        assert_eq!(round_ops_per_sec(99.456), 99.46);
        assert_eq!(round_ops_per_sec(1234.56), 1235.0);
    }

    #[test]
    fn test_run_self_timed() {
        let mut bench = Benchmark::with_options(
            "sum",
            options(0.001, 0.02),
            Work::sync(|| {
                std::hint::black_box((0..100u64).sum::<u64>());
            }),
        )
        .unwrap();

        let mut cycles = 0;
        let result = run_benchmark_with(&mut bench, |_| cycles += 1).unwrap();

        assert!(result.iterations >= MIN_ITERATIONS);
        assert!(result.cycles >= 1);
        assert_eq!(result.cycles, cycles);
        assert!(result.ops_sec > 0.0);
        assert!(result.histogram.is_finished());
    }

    #[test]
    fn test_run_aborts_on_failure() {
        let mut bench = Benchmark::with_options(
            "broken",
            options(0.001, 0.02),
            Work::sync(|| -> anyhow::Result<()> { Err(anyhow::anyhow!("nope")) }),
        )
        .unwrap();

        assert!(matches!(run_benchmark(&mut bench), Err(BenchError::Work(_))));
    }

    #[test]
    fn test_run_sleeping_work_hits_expected_rate() {
        let mut bench = Benchmark::with_options(
            "sleep",
            options(0.01, 0.1),
            Work::sync(|| std::thread::sleep(Duration::from_millis(2))),
        )
        .unwrap();

        let result = run_benchmark(&mut bench).unwrap();
        // At most 500 ops/sec for a 2ms sleep
        assert!(result.ops_sec <= 500.0);
        assert!(result.ops_sec > 100.0);
        assert!(result.histogram.min().unwrap() >= 2_000_000.0);
    }
}
