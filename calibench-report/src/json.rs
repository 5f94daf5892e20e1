//! JSON Output

use crate::report::{Report, ReportEntry, ReportMeta};
use crate::reporter::Reporter;
use calibench_core::{Benchmark, BenchmarkResult};
use std::io::{self, Write};

/// Generate a prettified JSON report.
pub fn generate_json_report(report: &Report) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}

/// Collects results and writes one JSON [`Report`] when the suite completes
#[derive(Debug)]
pub struct JsonReporter<W: Write> {
    out: W,
    suite: String,
    entries: Vec<ReportEntry>,
}

impl<W: Write> JsonReporter<W> {
    /// Reporter writing to `out`
    pub fn new(out: W) -> Self {
        Self {
            out,
            suite: String::new(),
            entries: Vec::new(),
        }
    }

    /// Recover the underlying writer
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Reporter for JsonReporter<W> {
    fn on_start(&mut self, suite: &str, count: usize) -> io::Result<()> {
        self.suite = suite.to_string();
        self.entries = Vec::with_capacity(count);
        Ok(())
    }

    fn on_result(&mut self, _benchmark: &Benchmark, result: &BenchmarkResult) -> io::Result<()> {
        let entry = ReportEntry::from_result(result).map_err(io::Error::other)?;
        self.entries.push(entry);
        Ok(())
    }

    fn on_complete(&mut self, _results: &[BenchmarkResult]) -> io::Result<()> {
        let report = Report {
            meta: ReportMeta::now(),
            suite: std::mem::take(&mut self.suite),
            results: std::mem::take(&mut self.entries),
        };
        let json = generate_json_report(&report)?;
        writeln!(self.out, "{json}")?;
        self.out.flush()
    }
}
