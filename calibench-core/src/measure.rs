//! High-Precision Timing
//!
//! A process-wide monotonic clock reporting nanoseconds since a lazily
//! captured anchor, an empirical resolution estimate, and the duration
//! formatter used by diagnostics and reporters.

use std::sync::OnceLock;

/// Nanoseconds per second
pub const NANOS_PER_SEC: f64 = 1e9;

static ANCHOR: OnceLock<std::time::Instant> = OnceLock::new();
static RESOLUTION_NS: OnceLock<u64> = OnceLock::new();

/// Probe rounds used when estimating the clock resolution
const RESOLUTION_PROBES: usize = 1_000;

/// Process-wide monotonic clock
#[derive(Debug, Clone, Copy, Default)]
pub struct Clock;

impl Clock {
    /// Nanoseconds since the process anchor. Never decreases.
    #[inline(always)]
    pub fn now() -> u64 {
        let anchor = ANCHOR.get_or_init(std::time::Instant::now);
        anchor.elapsed().as_nanos() as u64
    }

    /// Smallest measurable interval, in nanoseconds.
    ///
    /// Estimated once as the minimum non-zero difference between two
    /// consecutive readings; never below 1 ns.
    pub fn resolution_ns() -> u64 {
        *RESOLUTION_NS.get_or_init(measure_resolution)
    }

    /// Smallest measurable interval, in seconds
    pub fn resolution() -> f64 {
        Self::resolution_ns() as f64 / NANOS_PER_SEC
    }
}

/// Shorthand for [`Clock::now`]
#[inline(always)]
pub fn now() -> u64 {
    Clock::now()
}

/// Shorthand for [`Clock::resolution`]
pub fn resolution() -> f64 {
    Clock::resolution()
}

fn measure_resolution() -> u64 {
    let mut min_diff = u64::MAX;

    for _ in 0..RESOLUTION_PROBES {
        let t1 = Clock::now();
        let t2 = Clock::now();
        let diff = t2.saturating_sub(t1);
        if diff > 0 && diff < min_diff {
            min_diff = diff;
        }
    }

    if min_diff == u64::MAX { 1 } else { min_diff }
}

// ─── Stopwatch ───────────────────────────────────────────────────────────────

/// Measures one span on the process clock
#[derive(Debug, Clone, Copy)]
pub struct Stopwatch {
    started_at: u64,
}

impl Stopwatch {
    /// Start measuring
    #[inline(always)]
    pub fn start() -> Self {
        Self {
            started_at: Clock::now(),
        }
    }

    /// Nanoseconds elapsed since [`start`](Self::start)
    #[inline(always)]
    pub fn elapsed_ns(&self) -> u64 {
        Clock::now().saturating_sub(self.started_at)
    }
}

// ─── Formatting ──────────────────────────────────────────────────────────────

/// Render nanoseconds with the largest unit whose value is at least 1.
///
/// Seconds, milliseconds and microseconds get two decimals; nanoseconds none.
///
/// ```
/// # use calibench_core::format_duration;
/// assert_eq!(format_duration(1_500_000_000.0), "1.50s");
/// assert_eq!(format_duration(2_346_000.0), "2.35ms");
/// assert_eq!(format_duration(1_000.0), "1.00µs");
/// assert_eq!(format_duration(999.4), "999ns");
/// ```
pub fn format_duration(nanos: f64) -> String {
    if nanos >= 1e9 {
        format!("{:.2}s", nanos / 1e9)
    } else if nanos >= 1e6 {
        format!("{:.2}ms", nanos / 1e6)
    } else if nanos >= 1e3 {
        format!("{:.2}µs", nanos / 1e3)
    } else {
        format!("{:.0}ns", nanos)
    }
}
