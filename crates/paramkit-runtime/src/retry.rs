use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

/// Delay used when a policy does not specify one.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(5);

/// Pause between attempts.
#[derive(Clone)]
pub enum Delay {
    Fixed(Duration),
    /// Computed from the number of attempts made so far (starting at 1).
    Backoff(Arc<dyn Fn(u32) -> Duration + Send + Sync>),
}

impl Delay {
    pub fn backoff(f: impl Fn(u32) -> Duration + Send + Sync + 'static) -> Self {
        Delay::Backoff(Arc::new(f))
    }

    pub fn after(&self, attempts: u32) -> Duration {
        match self {
            Delay::Fixed(delay) => *delay,
            Delay::Backoff(f) => f(attempts),
        }
    }
}

impl Default for Delay {
    fn default() -> Self {
        Delay::Fixed(DEFAULT_RETRY_DELAY)
    }
}

impl fmt::Debug for Delay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Delay::Fixed(delay) => f.debug_tuple("Fixed").field(delay).finish(),
            Delay::Backoff(_) => f.write_str("Backoff(..)"),
        }
    }
}

/// How many times to retry and how long to wait in between.
#[derive(Debug, Clone, Default)]
pub struct RetryPolicy {
    /// Retries after the first attempt; total attempts is `retries + 1`.
    pub retries: u32,
    pub delay: Delay,
}

impl RetryPolicy {
    pub fn new(retries: u32) -> Self {
        Self {
            retries,
            delay: Delay::default(),
        }
    }

    pub fn with_delay(mut self, delay: Delay) -> Self {
        self.delay = delay;
        self
    }

    fn max_attempts(&self) -> u32 {
        self.retries.saturating_add(1)
    }
}

/// Why [`retry`] gave up.
#[derive(Debug, thiserror::Error)]
pub enum RetryError<E> {
    /// Every attempt completed without producing a value.
    #[error("retry limit reached after {attempts} attempts")]
    Exhausted { attempts: u32 },

    /// The final attempt failed.
    #[error("operation failed after {attempts} attempts: {source}")]
    Failed {
        attempts: u32,
        #[source]
        source: E,
    },
}

enum Outcome<T, E> {
    Done(T),
    Empty,
    Failed(E),
}

fn classify<T, E>(result: Result<Option<T>, E>) -> Outcome<T, E> {
    match result {
        Ok(Some(value)) => Outcome::Done(value),
        Ok(None) => Outcome::Empty,
        Err(err) => Outcome::Failed(err),
    }
}

/// Block the current thread.
pub fn sleep(duration: Duration) {
    std::thread::sleep(duration);
}

/// Run `op` until it yields a value or the policy is exhausted.
///
/// `Ok(Some(v))` finishes immediately; `Ok(None)` and `Err(_)` count as
/// failed attempts. The policy delay is slept between attempts, never after
/// the last one.
pub fn retry<T, E, F>(policy: &RetryPolicy, mut op: F) -> Result<T, RetryError<E>>
where
    F: FnMut() -> Result<Option<T>, E>,
    E: fmt::Display,
{
    let max_attempts = policy.max_attempts();
    let mut attempts = 0;
    loop {
        attempts += 1;
        let outcome = classify(op());
        match next_step(outcome, attempts, max_attempts) {
            Step::Return(result) => return result,
            Step::Wait => sleep(policy.delay.after(attempts)),
        }
    }
}

/// Async counterpart of [`sleep`].
#[cfg(feature = "async")]
pub async fn sleep_async(duration: Duration) {
    tokio::time::sleep(duration).await;
}

/// Async counterpart of [`retry`].
#[cfg(feature = "async")]
pub async fn retry_async<T, E, F, Fut>(policy: &RetryPolicy, mut op: F) -> Result<T, RetryError<E>>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<Option<T>, E>>,
    E: fmt::Display,
{
    let max_attempts = policy.max_attempts();
    let mut attempts = 0;
    loop {
        attempts += 1;
        let outcome = classify(op().await);
        match next_step(outcome, attempts, max_attempts) {
            Step::Return(result) => return result,
            Step::Wait => sleep_async(policy.delay.after(attempts)).await,
        }
    }
}

enum Step<T, E> {
    Return(Result<T, RetryError<E>>),
    Wait,
}

fn next_step<T, E: fmt::Display>(outcome: Outcome<T, E>, attempts: u32, max_attempts: u32) -> Step<T, E> {
    let last = attempts >= max_attempts;
    match outcome {
        Outcome::Done(value) => {
            debug!(attempts, "operation succeeded");
            Step::Return(Ok(value))
        }
        Outcome::Failed(source) if last => Step::Return(Err(RetryError::Failed { attempts, source })),
        Outcome::Empty if last => Step::Return(Err(RetryError::Exhausted { attempts })),
        Outcome::Failed(err) => {
            warn!(attempts, max_attempts, error = %err, "attempt failed, retrying");
            Step::Wait
        }
        Outcome::Empty => {
            warn!(attempts, max_attempts, "attempt produced no value, retrying");
            Step::Wait
        }
    }
}
