#![warn(missing_docs)]
//! Calibench Runner - Suite Orchestration
//!
//! Groups benchmarks into a [`Suite`], runs them in order and fans results
//! out to reporters. Defaults can come from a `calibench.toml`:
//!
//! ```ignore
//! use calibench_core::Work;
//! use calibench_runner::{CalibenchConfig, Suite, init_tracing};
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = CalibenchConfig::discover().unwrap_or_default();
//!     init_tracing(config.output.verbose);
//!
//!     let mut suite = Suite::from_config("strings", &config)?;
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

mod config;
mod suite;

pub use config::{CONFIG_FILE_NAME, CalibenchConfig, OutputConfig, RunnerConfig};
pub use suite::{Suite, SuiteError};

/// Install a `tracing` fmt subscriber filtered to `calibench=debug` when
/// `verbose`, `calibench=info` otherwise.
///
/// Does nothing if a global subscriber is already installed.
pub fn init_tracing(verbose: bool) {
    let filter = if verbose {
        "calibench=debug"
    } else {
        "calibench=info"
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
