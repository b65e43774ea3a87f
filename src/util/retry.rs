//! Bounded retry with a fixed inter-attempt delay.

use std::future::Future;
use std::time::Duration;

/// Outcome of a bounded retry run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryOutcome<T> {
    /// The probe produced a value on the recorded attempt.
    Success { value: T, attempts: u32 },
    /// Every attempt ran without producing a value.
    Exhausted { attempts: u32 },
}

/// Fixed-delay retry policy.
///
/// The delay is deliberately not exponential: the transient failure this
/// policy exists for (a one-time code consumed or expired mid-flight) clears
/// on a fixed rotation period, so waiting past one full period is both
/// necessary and sufficient.
#[derive(Debug, Clone)]
pub struct FixedRetry {
    /// Maximum number of attempts (including the first).
    pub max_attempts: u32,
    /// Sleep between consecutive attempts.
    pub delay: Duration,
}

impl Default for FixedRetry {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(120),
        }
    }
}

impl FixedRetry {
    /// Run `attempt` until it yields a value or attempts are exhausted.
    ///
    /// `Ok(Some(value))` ends the run immediately; `Ok(None)` sleeps the
    /// fixed delay and tries again; `Err` is structural and aborts with no
    /// further attempts. The closure receives the 1-based attempt ordinal.
    pub async fn run<F, Fut, T, E>(&self, mut attempt: F) -> Result<RetryOutcome<T>, E>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<Option<T>, E>>,
    {
        let mut attempts = 0;
        while attempts < self.max_attempts {
            attempts += 1;
            if let Some(value) = attempt(attempts).await? {
                return Ok(RetryOutcome::Success { value, attempts });
            }
            if attempts < self.max_attempts {
                tracing::warn!(
                    attempt = attempts,
                    max_attempts = self.max_attempts,
                    delay_secs = self.delay.as_secs(),
                    "attempt yielded no result, waiting before retry"
                );
                tokio::time::sleep(self.delay).await;
            }
        }
        Ok(RetryOutcome::Exhausted { attempts })
    }
}
