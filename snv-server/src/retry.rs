//! Bounded retries with a fixed delay.
//!
//! Every upstream call of the resolver goes through a [`RetryPolicy`]. The
//! first call counts as attempt 1, so `max_attempts` is the total number of
//! invocations. A policy with zero attempts never invokes the operation.
//!
//! Callers that can tolerate failure supply a default value with
//! [`RetryPolicy::run_with_default`]; the default is returned as-is, so an
//! empty collection is a perfectly good default.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use tracing::{debug, warn};

/// Errors from a retried operation.
#[derive(Debug, thiserror::Error)]
pub enum RetryError<E> {
    /// The policy permitted no attempt at all
    #[error("retries exhausted: {max_attempts} attempt(s) permitted")]
    Exhausted { max_attempts: u32 },

    /// Every attempt failed; carries the last underlying error
    #[error("gave up after {attempts} attempt(s): {source}")]
    Failed {
        attempts: u32,
        #[source]
        source: E,
    },
}

impl<E> RetryError<E> {
    /// The last underlying error, if any attempt was made.
    pub fn into_source(self) -> Option<E> {
        match self {
            RetryError::Exhausted { .. } => None,
            RetryError::Failed { source, .. } => Some(source),
        }
    }
}

/// How many times to try an operation and how long to wait in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total number of invocations, including the first.
    pub max_attempts: u32,
    /// Pause between consecutive attempts.
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }

    /// Run `operation` until it succeeds or the attempts run out.
    ///
    /// Sleeps asynchronously between attempts.
    pub async fn run<T, E, F, Fut>(&self, mut operation: F) -> Result<T, RetryError<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: fmt::Display,
    {
        let mut attempt = 0;

        loop {
            if attempt >= self.max_attempts {
                return Err(RetryError::Exhausted {
                    max_attempts: self.max_attempts,
                });
            }
            attempt += 1;

            match operation().await {
                Ok(value) => return Ok(value),
                Err(e) if attempt >= self.max_attempts => {
                    warn!(attempt, error = %e, "giving up");
                    return Err(RetryError::Failed {
                        attempts: attempt,
                        source: e,
                    });
                }
                Err(e) => {
                    debug!(
                        attempt,
                        max = self.max_attempts,
                        error = %e,
                        "attempt failed, retrying"
                    );
                    tokio::time::sleep(self.delay).await;
                }
            }
        }
    }

    /// Like [`run`](Self::run), but returns `default` once the attempts
    /// run out instead of failing.
    pub async fn run_with_default<T, E, F, Fut>(&self, operation: F, default: T) -> T
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: fmt::Display,
    {
        self.run(operation).await.unwrap_or(default)
    }

    /// Blocking counterpart of [`run`](Self::run) for synchronous callers.
    ///
    /// Sleeps the current thread between attempts; do not call this from
    /// inside an async runtime.
    pub fn run_blocking<T, E, F>(&self, mut operation: F) -> Result<T, RetryError<E>>
    where
        F: FnMut() -> Result<T, E>,
        E: fmt::Display,
    {
        let mut attempt = 0;

        loop {
            if attempt >= self.max_attempts {
                return Err(RetryError::Exhausted {
                    max_attempts: self.max_attempts,
                });
            }
            attempt += 1;

            match operation() {
                Ok(value) => return Ok(value),
                Err(e) if attempt >= self.max_attempts => {
                    warn!(attempt, error = %e, "giving up");
                    return Err(RetryError::Failed {
                        attempts: attempt,
                        source: e,
                    });
                }
                Err(e) => {
                    debug!(
                        attempt,
                        max = self.max_attempts,
                        error = %e,
                        "attempt failed, retrying"
                    );
                    std::thread::sleep(self.delay);
                }
            }
        }
    }

    /// Blocking counterpart of [`run_with_default`](Self::run_with_default).
    pub fn run_blocking_with_default<T, E, F>(&self, operation: F, default: T) -> T
    where
        F: FnMut() -> Result<T, E>,
        E: fmt::Display,
    {
        self.run_blocking(operation).unwrap_or(default)
    }
}
