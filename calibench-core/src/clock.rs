//! Cycle Clocking
//!
//! Runs exactly one cycle of a benchmark in its timing mode and reports the
//! elapsed nanoseconds together with the number of operations measured.

use crate::benchmark::Benchmark;
use crate::error::BenchError;
use crate::measure::{Stopwatch, format_duration};
use crate::timer::ManagedTimer;
use crate::work::Work;

/// Clock one cycle of `bench`.
///
/// Self-timed work is invoked `iterations` times back to back (futures are
/// awaited one at a time). Externally-timed work is invoked once with a
/// [`ManagedTimer`] recommending `iterations`; the returned count is whatever
/// the work passed to `end`.
pub fn clock_benchmark(bench: &mut Benchmark, iterations: u64) -> Result<(u64, u64), BenchError> {
    let (work, driver) = bench.parts_mut();

    let (duration_ns, measured) = match work {
        Work::Sync(f) => {
            let watch = Stopwatch::start();
            for _ in 0..iterations {
                f().map_err(BenchError::Work)?;
            }
            (watch.elapsed_ns(), iterations)
        }
        Work::Async(f) => {
            driver.prepare()?;
            let watch = Stopwatch::start();
            driver
                .block_on(async {
                    for _ in 0..iterations {
                        f().await?;
                    }
                    Ok::<(), anyhow::Error>(())
                })?
                .map_err(BenchError::Work)?;
            (watch.elapsed_ns(), iterations)
        }
        Work::Managed(f) => {
            let timer = ManagedTimer::new(iterations);
            f(&timer).map_err(BenchError::Work)?;
            timer.result()?
        }
        Work::ManagedAsync(f) => {
            let timer = ManagedTimer::new(iterations);
            driver.block_on(f(timer.clone()))?.map_err(BenchError::Work)?;
            timer.result()?
        }
    };

    tracing::debug!(
        benchmark = bench.name(),
        "Took {} to execute {} iterations",
        format_duration(duration_ns as f64),
        measured
    );

    Ok((duration_ns, measured))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TimerError;
    use std::cell::Cell;
    use std::rc::Rc;
    use std::time::Duration;

    #[test]
    fn test_self_timed_runs_requested_iterations() {
        let calls = Rc::new(Cell::new(0u64));
        let counter = calls.clone();
        let mut bench = Benchmark::new(
            "count",
            Work::sync(move || counter.set(counter.get() + 1)),
        )
        .unwrap();

        let (_, measured) = clock_benchmark(&mut bench, 25).unwrap();
        assert_eq!(measured, 25);
        assert_eq!(calls.get(), 25);
    }

    #[test]
    fn test_async_iterations_run_sequentially() {
        let in_flight = Rc::new(Cell::new(0u32));
        let max_seen = Rc::new(Cell::new(0u32));
        let (flight, seen) = (in_flight.clone(), max_seen.clone());

        let mut bench = Benchmark::new(
            "sequential",
            Work::future(move || {
                let (flight, seen) = (flight.clone(), seen.clone());
                async move {
                    flight.set(flight.get() + 1);
                    seen.set(seen.get().max(flight.get()));
                    tokio::task::yield_now().await;
                    flight.set(flight.get() - 1);
                }
            }),
        )
        .unwrap();

        let (_, measured) = clock_benchmark(&mut bench, 8).unwrap();
        assert_eq!(measured, 8);
        assert_eq!(max_seen.get(), 1);
    }

    #[tokio::test]
    async fn test_async_inside_current_thread_runtime_errors() {
        let mut bench = Benchmark::new(
            "current-thread",
            Work::future(|| async { tokio::task::yield_now().await }),
        )
        .unwrap();

        let err = clock_benchmark(&mut bench, 10).unwrap_err();
        assert!(matches!(err, BenchError::UnsupportedRuntime));
    }

    #[test]
    fn test_managed_reports_own_count() {
        let mut bench = Benchmark::new(
            "managed",
            Work::managed(|timer: &ManagedTimer| -> Result<(), TimerError> {
                assert_eq!(timer.count(), 40);
                timer.start();
                std::thread::sleep(Duration::from_millis(2));
                timer.end(7)
            }),
        )
        .unwrap();

        let (duration, measured) = clock_benchmark(&mut bench, 40).unwrap();
        assert_eq!(measured, 7);
        assert!(duration >= 1_000_000);
    }

    #[test]
    fn test_managed_async() {
        let mut bench = Benchmark::new(
            "managed-async",
            Work::managed_future(|timer: ManagedTimer| async move {
                timer.start();
                tokio::time::sleep(Duration::from_millis(1)).await;
                timer.end(timer.count())
            }),
        )
        .unwrap();

        let (duration, measured) = clock_benchmark(&mut bench, 12).unwrap();
        assert_eq!(measured, 12);
        assert!(duration >= 500_000);
    }

    #[test]
    fn test_forgotten_end_is_an_error() {
        let mut bench = Benchmark::new(
            "no-end",
            Work::managed(|timer: &ManagedTimer| timer.start()),
        )
        .unwrap();

        let err = clock_benchmark(&mut bench, 10).unwrap_err();
        assert!(matches!(err, BenchError::Timer(TimerError::MissingEnd)));
    }

    #[test]
    fn test_work_failure_propagates() {
        let calls = Rc::new(Cell::new(0u32));
        let counter = calls.clone();
        let mut bench = Benchmark::new(
            "fails",
            Work::sync(move || {
                counter.set(counter.get() + 1);
                if counter.get() == 3 {
                    anyhow::bail!("third call fails");
                }
                Ok(())
            }),
        )
        .unwrap();

        let err = clock_benchmark(&mut bench, 10).unwrap_err();
        assert!(matches!(err, BenchError::Work(_)));
        assert!(err.to_string().contains("third call fails"));
        // Iteration stops at the failure
        assert_eq!(calls.get(), 3);
    }
}
