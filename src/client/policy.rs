use crate::Error;
use std::time::Duration;

/// Default number of attempts per call.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 2;
/// Default backoff unit; attempt `n` waits `n` times this before the next try.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(1_000);

/// What to do after a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Sleep, then make the next attempt.
    Retry { delay: Duration },
    /// Retryable failure, but the budget is spent.
    Exhausted,
    /// Not retryable; end the call with this error as-is.
    Fail,
}

/// Retry budget with linear backoff.
///
/// Independent of the transport: it only looks at the error and the attempt index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    /// A single attempt, no retry.
    pub fn once() -> Self {
        Self::new(1, Duration::ZERO)
    }

    pub fn with_max_attempts(self, max_attempts: u32) -> Self {
        Self::new(max_attempts, self.base_delay)
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn base_delay(&self) -> Duration {
        self.base_delay
    }

    /// Backoff after the failed attempt `attempt` (1-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(attempt)
    }

    /// Decide how to proceed after attempt `attempt` (1-based) failed with `err`.
    pub fn decide(&self, err: &Error, attempt: u32) -> Decision {
        if !err.is_retryable() {
            return Decision::Fail;
        }
        if attempt < self.max_attempts {
            Decision::Retry {
                delay: self.delay_for(attempt),
            }
        } else {
            Decision::Exhausted
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS, DEFAULT_RETRY_DELAY)
    }
}
