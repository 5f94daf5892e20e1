//! Benchmark Suite
//!
//! An ordered list of benchmarks sharing default options and a set of
//! reporters. Benchmarks run strictly one after another, in insertion order.

use crate::config::CalibenchConfig;
use calibench_core::{
    BenchError, BenchOptions, Benchmark, BenchmarkResult, Work, run_benchmark_with,
};
use calibench_report::{ConsoleReporter, Reporter};
use std::fmt;
use std::io;
use thiserror::Error;

/// Suite registration and run errors
#[derive(Debug, Error)]
pub enum SuiteError {
    #[error("Benchmark name must be a non-empty string")]
    EmptyName,

    #[error("Benchmark '{name}' failed: {source}")]
    Bench {
        name: String,
        #[source]
        source: BenchError,
    },

    #[error("Reporter failed: {0}")]
    Report(#[from] io::Error),
}

/// Ordered collection of benchmarks
pub struct Suite {
    name: String,
    options: BenchOptions,
    benchmarks: Vec<Benchmark>,
    reporters: Vec<Box<dyn Reporter>>,
}

impl Suite {
    /// Suite reporting each result to stdout
    pub fn new(name: impl Into<String>) -> Self {
        let mut suite = Self::silent(name);
        suite.subscribe(ConsoleReporter::stdout());
        suite
    }

    /// Suite with no reporters
    pub fn silent(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            options: BenchOptions::default(),
            benchmarks: Vec::new(),
            reporters: Vec::new(),
        }
    }

    /// Suite whose default options and stdout reporter come from `config`
    pub fn from_config(name: impl Into<String>, config: &CalibenchConfig) -> anyhow::Result<Self> {
        let options = config.bench_options()?;
        let format = config.output_format()?;

        let mut suite = Self::silent(name);
        suite.options = options;
        suite.reporters.push(format.stdout_reporter());
        Ok(suite)
    }

    /// Add a benchmark using the suite's default options
    pub fn add(&mut self, name: impl Into<String>, work: Work) -> Result<&mut Self, SuiteError> {
        let options = self.options;
        self.add_with_options(name, options, work)
    }

    /// Add a benchmark with its own options
    pub fn add_with_options(
        &mut self,
        name: impl Into<String>,
        options: BenchOptions,
        work: Work,
    ) -> Result<&mut Self, SuiteError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(SuiteError::EmptyName);
        }

        let bench = Benchmark::with_options(name.clone(), options, work)
            .map_err(|source| SuiteError::Bench { name, source })?;
        self.benchmarks.push(bench);
        Ok(self)
    }

    /// Add a reporter
    pub fn subscribe(&mut self, reporter: impl Reporter + 'static) -> &mut Self {
        self.reporters.push(Box::new(reporter));
        self
    }

    /// Replace every reporter with `reporter`
    pub fn set_reporter(&mut self, reporter: impl Reporter + 'static) -> &mut Self {
        self.reporters.clear();
        self.subscribe(reporter)
    }

    /// Suite name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Default options for [`add`](Self::add)
    pub fn default_options(&self) -> &BenchOptions {
        &self.options
    }

    /// Registered benchmarks, in execution order
    pub fn benchmarks(&self) -> &[Benchmark] {
        &self.benchmarks
    }

    /// Number of registered benchmarks
    pub fn len(&self) -> usize {
        self.benchmarks.len()
    }

    /// Whether no benchmarks are registered
    pub fn is_empty(&self) -> bool {
        self.benchmarks.is_empty()
    }

    /// Run every benchmark in order.
    ///
    /// The first failing benchmark aborts the run; results gathered so far
    /// are discarded.
    pub fn run(&mut self) -> Result<Vec<BenchmarkResult>, SuiteError> {
        tracing::info!(suite = %self.name, "Running {} benchmarks", self.benchmarks.len());

        for reporter in &mut self.reporters {
            reporter.on_start(&self.name, self.benchmarks.len())?;
        }

        let mut results = Vec::with_capacity(self.benchmarks.len());
        for bench in &mut self.benchmarks {
            tracing::debug!(suite = %self.name, benchmark = bench.name(), "Starting benchmark");

            let name = bench.name().to_string();
            let reporters = &mut self.reporters;
            let mut report_error = None;

            let result = run_benchmark_with(bench, |sample| {
                if report_error.is_some() {
                    return;
                }
                for reporter in reporters.iter_mut() {
                    if let Err(e) = reporter.on_cycle(&name, sample) {
                        report_error = Some(e);
                        return;
                    }
                }
            })
            .map_err(|source| SuiteError::Bench {
                name: name.clone(),
                source,
            })?;

            if let Some(e) = report_error {
                return Err(e.into());
            }

            for reporter in &mut self.reporters {
                reporter.on_result(bench, &result)?;
            }

            tracing::debug!(
                suite = %self.name,
                benchmark = %name,
                ops_sec = result.ops_sec,
                "Finished benchmark"
            );
            results.push(result);
        }

        for reporter in &mut self.reporters {
            reporter.on_complete(&results)?;
        }

        Ok(results)
    }
}

impl fmt::Debug for Suite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Suite")
            .field("name", &self.name)
            .field("options", &self.options)
            .field("benchmarks", &self.benchmarks)
            .field("reporters", &self.reporters.len())
            .finish()
    }
}
