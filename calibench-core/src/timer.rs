//! Externally-Timed Cycles
//!
//! A [`ManagedTimer`] is handed to work registered with
//! [`Work::managed`](crate::Work::managed) or
//! [`Work::managed_future`](crate::Work::managed_future). The work is invoked
//! once per cycle and brackets the region it wants measured with
//! [`start`](ManagedTimer::start) and [`end`](ManagedTimer::end), reporting
//! how many operations ran in between.

use crate::error::TimerError;
use crate::measure::Clock;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
struct TimerState {
    start: Option<u64>,
    end: Option<u64>,
    iterations: Option<u64>,
}

/// Timer handle for work that measures its own span.
///
/// Cloning yields another handle onto the same measurement, so async work
/// can move a clone into its future.
#[derive(Debug, Clone)]
pub struct ManagedTimer {
    recommended: u64,
    state: Arc<Mutex<TimerState>>,
}

impl ManagedTimer {
    /// Create a timer recommending `recommended` iterations
    pub fn new(recommended: u64) -> Self {
        Self {
            recommended,
            state: Arc::new(Mutex::new(TimerState::default())),
        }
    }

    fn state(&self) -> MutexGuard<'_, TimerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Iteration count the harness recommends for this cycle
    pub fn count(&self) -> u64 {
        self.recommended
    }

    /// Start (or restart) the measured region
    #[inline]
    pub fn start(&self) {
        let now = Clock::now();
        self.state().start = Some(now);
    }

    /// Close the measured region, reporting `iterations` operations.
    ///
    /// `iterations` must be at least 1, and [`start`](Self::start) must have
    /// been called first.
    #[inline]
    pub fn end(&self, iterations: u64) -> Result<(), TimerError> {
        let now = Clock::now();
        if iterations == 0 {
            return Err(TimerError::InvalidIterations(iterations));
        }

        let mut state = self.state();
        if state.start.is_none() {
            return Err(TimerError::EndBeforeStart);
        }
        state.end = Some(now);
        state.iterations = Some(iterations);
        Ok(())
    }

    /// Close the measured region after a single operation
    #[inline]
    pub fn end_one(&self) -> Result<(), TimerError> {
        self.end(1)
    }

    /// Measured `(duration_ns, iterations)`.
    ///
    /// Fails if the work never called `end` or `start`.
    pub fn result(&self) -> Result<(u64, u64), TimerError> {
        let state = self.state();
        let (Some(end), Some(iterations)) = (state.end, state.iterations) else {
            return Err(TimerError::MissingEnd);
        };
        let start = state.start.ok_or(TimerError::MissingStart)?;

        Ok((end.saturating_sub(start), iterations))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_count_is_recommendation() {
        assert_eq!(ManagedTimer::new(250).count(), 250);
    }

    #[test]
    fn test_measures_bracketed_region() {
        let timer = ManagedTimer::new(10);
        timer.start();
        std::thread::sleep(Duration::from_millis(5));
        timer.end(3).unwrap();

        let (duration, iterations) = timer.result().unwrap();
        assert!(duration >= 4_000_000);
        assert_eq!(iterations, 3);
    }

    #[test]
    fn test_missing_end() {
        let timer = ManagedTimer::new(10);
        timer.start();
        assert_eq!(timer.result(), Err(TimerError::MissingEnd));
    }

    #[test]
    fn test_end_before_start() {
        let timer = ManagedTimer::new(10);
        assert_eq!(timer.end(1), Err(TimerError::EndBeforeStart));
        // The rejected end() leaves nothing to read
        assert_eq!(timer.result(), Err(TimerError::MissingEnd));
    }

    #[test]
    fn test_zero_iterations_rejected() {
        let timer = ManagedTimer::new(10);
        timer.start();
        assert_eq!(timer.end(0), Err(TimerError::InvalidIterations(0)));
        assert_eq!(timer.result(), Err(TimerError::MissingEnd));
    }

    #[test]
    fn test_clones_share_state() {
        let timer = ManagedTimer::new(10);
        let handle = timer.clone();
        handle.start();
        handle.end_one().unwrap();

        assert_eq!(timer.result().map(|(_, n)| n), Ok(1));
    }
}
