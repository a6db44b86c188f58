//! Compute-once primitive for asynchronous initialization routines.
//!
//! A [`SingleFlight`] memoizes the *outcome* of the first computation it is
//! asked to run, successful or not. Callers arriving while the computation is
//! still pending join it instead of starting a new one, and callers arriving
//! after it settled receive the memoized value. There is no reset: a failure
//! stays a failure for the lifetime of the instance.

use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};

/// Shared outcome of a single-flight computation.
///
/// Errors are wrapped in an [`Arc`] so the same failure instance can be
/// handed to every caller.
pub type SharedOutcome<T, E> = Shared<BoxFuture<'static, Result<T, Arc<E>>>>;

pub struct SingleFlight<T, E> {
    outcome: Mutex<Option<SharedOutcome<T, E>>>,
}

impl<T, E> Default for SingleFlight<T, E>
where
    T: Clone + Send + Sync + 'static,
    E: Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, E> SingleFlight<T, E>
where
    T: Clone + Send + Sync + 'static,
    E: Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self {
            outcome: Mutex::new(None),
        }
    }

    /// Returns the memoized shared outcome, installing the one produced by
    /// `init` if this is the first call.
    ///
    /// `init` is invoked at most once per instance. The returned future can
    /// be awaited by any number of callers, none of them can cancel the
    /// underlying computation for the others.
    pub fn get_or_start<F, Fut>(&self, init: F) -> SharedOutcome<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        // The lock is held only to install or clone the shared future
        let mut outcome = self.outcome.lock().unwrap_or_else(PoisonError::into_inner);

        outcome
            .get_or_insert_with(|| init().map(|r| r.map_err(Arc::new)).boxed().shared())
            .clone()
    }

    /// Runs `init` the first time it is called and awaits the shared outcome.
    pub async fn run<F, Fut>(&self, init: F) -> Result<T, Arc<E>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        self.get_or_start(init).await
    }

    /// True once a computation was started, whether or not it has settled.
    pub fn is_started(&self) -> bool {
        self.outcome
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Returns the settled outcome, if any, without driving the computation.
    pub fn peek(&self) -> Option<Result<T, Arc<E>>> {
        self.outcome
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .and_then(|shared| shared.peek().cloned())
    }
}
