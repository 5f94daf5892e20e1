//! Calibench Example Benchmarks
//!
//! This example demonstrates Calibench features and serves as a template for
//! creating your own benchmark suite.
//!
//! Run with:
//!   cargo run --example benchmarks
//!
//! A `calibench.toml` in this directory or any parent sets the default time
//! budget and output format. Set `verbose = true` under `[output]` to see the
//! calibration log.

use calibench::prelude::*;
use calibench::{CalibenchConfig, init_tracing};
use std::hint::black_box;
use std::time::Duration;

// ============================================================================
// Self-Timed Work
// ============================================================================

fn add_arithmetic(suite: &mut Suite) -> Result<(), SuiteError> {
    let (x, y) = (42u64, 17u64);
    suite.add(
        "addition",
        Work::sync(move || {
            black_box(black_box(x) + black_box(y));
        }),
    )?;

    let data: Vec<i64> = (0..1000).collect();
    suite.add(
        "vector sum",
        Work::sync(move || {
            black_box(data.iter().sum::<i64>());
        }),
    )?;

    Ok(())
}

fn add_parsing(suite: &mut Suite) -> Result<(), SuiteError> {
    // Work may fail; an Err aborts the suite
    suite.add(
        "parse u64",
        Work::sync(|| black_box("18446744073709551615").parse::<u64>()),
    )?;
    Ok(())
}

// ============================================================================
// Externally-Timed Work
// ============================================================================

fn add_sorting(suite: &mut Suite) -> Result<(), SuiteError> {
    // Setup runs outside the measured region
    suite.add(
        "sort 1k reversed",
        Work::managed(|timer: &ManagedTimer| {
            let mut inputs: Vec<Vec<u32>> = (0..timer.count())
                .map(|_| (0..1000).rev().collect())
                .collect();

            timer.start();
            for input in &mut inputs {
                input.sort_unstable();
            }
            timer.end(timer.count())
        }),
    )?;

    Ok(())
}

// ============================================================================
// Async Work
// ============================================================================

fn add_async(suite: &mut Suite) -> Result<(), SuiteError> {
    let short = suite
        .default_options()
        .with_max_time(Duration::from_millis(250));
    suite.add_with_options(
        "sleep 1ms",
        short,
        Work::future(|| tokio::time::sleep(Duration::from_millis(1))),
    )?;

    suite.add(
        "spawn + join",
        Work::managed_future(|timer: ManagedTimer| async move {
            timer.start();
            for i in 0..timer.count() {
                tokio::spawn(async move { black_box(i) }).await?;
            }
            timer.end(timer.count())?;
            Ok::<(), anyhow::Error>(())
        }),
    )?;

    Ok(())
}

fn main() -> anyhow::Result<()> {
    let config = CalibenchConfig::discover().unwrap_or_default();
    init_tracing(config.output.verbose);

    let mut suite = Suite::from_config("examples", &config)?;
    add_arithmetic(&mut suite)?;
    add_parsing(&mut suite)?;
    add_sorting(&mut suite)?;
    add_async(&mut suite)?;

    suite.run()?;
    Ok(())
}
