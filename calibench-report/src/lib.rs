#![warn(missing_docs)]
//! Calibench Report - Result Reporting
//!
//! Consumers of [`BenchmarkResult`](calibench_core::BenchmarkResult)s produced by a suite run:
//! - [`Reporter`] event trait (any result closure is a reporter)
//! - [`ConsoleReporter`]: one human-readable line per benchmark
//! - [`JsonReporter`]: a single pretty JSON [`Report`] once the run completes

mod console;
mod format;
mod json;
mod report;
mod reporter;

pub use calibench_core::format_duration;
pub use console::ConsoleReporter;
pub use format::{format_number, format_result_line};
pub use json::{JsonReporter, generate_json_report};
pub use report::{Report, ReportEntry, ReportMeta};
pub use reporter::Reporter;

/// Output format selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable terminal output
    #[default]
    Human,
    /// Pretty JSON report
    Json,
}

impl OutputFormat {
    /// Reporter writing this format to stdout
    pub fn stdout_reporter(self) -> Box<dyn Reporter> {
        match self {
            OutputFormat::Human => Box::new(ConsoleReporter::stdout()),
            OutputFormat::Json => Box::new(JsonReporter::new(std::io::stdout())),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "human" | "text" => Ok(OutputFormat::Human),
            other => Err(format!("Unknown output format: {}", other)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Human => f.write_str("human"),
            OutputFormat::Json => f.write_str("json"),
        }
    }
}
