//! Units of Work
//!
//! The timing mode is chosen explicitly at registration:
//!
//! | constructor              | timing            | work signature                    |
//! |--------------------------|-------------------|-----------------------------------|
//! | [`Work::sync`]           | self-timed        | `FnMut() -> R`                    |
//! | [`Work::future`]         | self-timed        | `FnMut() -> impl Future<Output=R>`|
//! | [`Work::managed`]        | externally-timed  | `FnMut(&ManagedTimer) -> R`       |
//! | [`Work::managed_future`] | externally-timed  | `FnMut(ManagedTimer) -> impl Future<Output=R>` |
//!
//! `R` is `()` or any `Result<T, E>` whose error converts into
//! [`anyhow::Error`]; an `Err` aborts the benchmark.

use crate::error::BenchError;
use crate::timer::ManagedTimer;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use tokio::runtime::{Handle, RuntimeFlavor};

/// Outcome of a single invocation of a unit of work
pub type WorkResult = Result<(), anyhow::Error>;

/// Boxed future produced by async work
pub type WorkFuture = Pin<Box<dyn Future<Output = WorkResult>>>;

/// Values a unit of work may return
pub trait WorkOutcome {
    /// Convert into the harness' result type
    fn into_result(self) -> WorkResult;
}

impl WorkOutcome for () {
    #[inline(always)]
    fn into_result(self) -> WorkResult {
        Ok(())
    }
}

impl<T, E> WorkOutcome for Result<T, E>
where
    E: Into<anyhow::Error>,
{
    #[inline(always)]
    fn into_result(self) -> WorkResult {
        match self {
            Ok(value) => {
                std::hint::black_box(value);
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// How a cycle is timed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimingMode {
    /// The harness times `count` back-to-back invocations
    SelfTimed,
    /// The work is invoked once and reports its own span via [`ManagedTimer`]
    ExternallyTimed,
}

/// A unit of work to benchmark
pub enum Work {
    /// Self-timed synchronous work
    Sync(Box<dyn FnMut() -> WorkResult>),
    /// Self-timed asynchronous work; each iteration is awaited before the next
    Async(Box<dyn FnMut() -> WorkFuture>),
    /// Externally-timed synchronous work
    Managed(Box<dyn FnMut(&ManagedTimer) -> WorkResult>),
    /// Externally-timed asynchronous work
    ManagedAsync(Box<dyn FnMut(ManagedTimer) -> WorkFuture>),
}

impl Work {
    /// Self-timed synchronous work
    pub fn sync<F, R>(mut f: F) -> Self
    where
        F: FnMut() -> R + 'static,
        R: WorkOutcome,
    {
        Work::Sync(Box::new(move || f().into_result()))
    }

    /// Self-timed asynchronous work
    pub fn future<F, Fut>(mut f: F) -> Self
    where
        F: FnMut() -> Fut + 'static,
        Fut: Future + 'static,
        Fut::Output: WorkOutcome,
    {
        Work::Async(Box::new(move || {
            let fut = f();
            Box::pin(async move { fut.await.into_result() })
        }))
    }

    /// Externally-timed synchronous work
    pub fn managed<F, R>(mut f: F) -> Self
    where
        F: FnMut(&ManagedTimer) -> R + 'static,
        R: WorkOutcome,
    {
        Work::Managed(Box::new(move |timer| f(timer).into_result()))
    }

    /// Externally-timed asynchronous work
    pub fn managed_future<F, Fut>(mut f: F) -> Self
    where
        F: FnMut(ManagedTimer) -> Fut + 'static,
        Fut: Future + 'static,
        Fut::Output: WorkOutcome,
    {
        Work::ManagedAsync(Box::new(move |timer| {
            let fut = f(timer);
            Box::pin(async move { fut.await.into_result() })
        }))
    }

    /// Timing mode of this work
    pub fn mode(&self) -> TimingMode {
        match self {
            Work::Sync(_) | Work::Async(_) => TimingMode::SelfTimed,
            Work::Managed(_) | Work::ManagedAsync(_) => TimingMode::ExternallyTimed,
        }
    }

    /// Whether invocations produce futures
    pub fn is_async(&self) -> bool {
        matches!(self, Work::Async(_) | Work::ManagedAsync(_))
    }
}

impl fmt::Debug for Work {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Work")
            .field("mode", &self.mode())
            .field("async", &self.is_async())
            .finish()
    }
}

/// Drives async work to completion from the synchronous calibration loop.
///
/// Inside a multi-threaded tokio runtime the ambient handle is used through
/// `block_in_place`; otherwise a current-thread runtime is built on first use
/// and cached for the rest of the benchmark.
#[derive(Default)]
pub struct AsyncDriver {
    cached_runtime: Option<tokio::runtime::Runtime>,
}

impl AsyncDriver {
    /// Create a driver with no runtime yet
    pub fn new() -> Self {
        Self::default()
    }

    /// Make sure a runtime is ready, so that its construction is not timed.
    ///
    /// Fails inside a current-thread runtime, where blocking on the ambient
    /// handle is impossible.
    pub fn prepare(&mut self) -> Result<(), BenchError> {
        if let Ok(handle) = Handle::try_current() {
            return match handle.runtime_flavor() {
                RuntimeFlavor::CurrentThread => Err(BenchError::UnsupportedRuntime),
                _ => Ok(()),
            };
        }

        if self.cached_runtime.is_none() {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?;
            self.cached_runtime = Some(runtime);
        }
        Ok(())
    }

    /// Run `fut` to completion on the current thread
    pub fn block_on<F: Future>(&mut self, fut: F) -> Result<F::Output, BenchError> {
        self.prepare()?;

        if let Ok(handle) = Handle::try_current() {
            return Ok(tokio::task::block_in_place(|| handle.block_on(fut)));
        }

        match &self.cached_runtime {
            Some(runtime) => Ok(runtime.block_on(fut)),
            None => Err(BenchError::UnsupportedRuntime),
        }
    }
}

impl fmt::Debug for AsyncDriver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncDriver")
            .field("cached_runtime", &self.cached_runtime.is_some())
            .finish()
    }
}
