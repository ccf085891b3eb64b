//! Fixed-delay retry policy for network failures

use std::time::Duration;

/// Decides whether a failed attempt is re-issued and after how long.
///
/// Only requests that received no response are ever handed to the policy;
/// responses with an error status are terminal regardless of the policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of retry attempts after the first dispatch
    pub max_retries: u32,
    /// Delay before every retry
    pub retry_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            retry_delay: Duration::from_millis(1000),
        }
    }
}

impl RetryPolicy {
    pub fn fixed(max_retries: u32, retry_delay: Duration) -> Self {
        Self {
            max_retries,
            retry_delay,
        }
    }

    /// Policy that never retries
    pub fn none() -> Self {
        Self::fixed(0, Duration::ZERO)
    }

    /// Delay before the next attempt, or `None` once `attempt_count` retries are spent
    pub fn next_delay(&self, attempt_count: u32) -> Option<Duration> {
        (attempt_count < self.max_retries).then_some(self.retry_delay)
    }

    /// Upper bound on transport invocations for one logical call
    pub fn max_attempts(&self) -> u32 {
        self.max_retries + 1
    }
}
