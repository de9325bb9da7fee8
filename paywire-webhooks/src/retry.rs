//! Retry policy for webhook delivery

use std::time::Duration;

/// Exponential backoff without jitter or cap.
///
/// After failed attempt `k` the next attempt waits `initial_delay * 2^(k-1)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first. Zero behaves like one.
    pub max_attempts: u32,

    /// Delay after the first failed attempt
    pub initial_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(5000),
        }
    }
}

impl RetryPolicy {
    /// Create a policy with exponential backoff
    pub fn exponential(max_attempts: u32, initial_delay: Duration) -> Self {
        Self {
            max_attempts,
            initial_delay,
        }
    }

    /// Create a policy that makes a single attempt
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            ..Default::default()
        }
    }

    /// Delay to wait after failed attempt number `attempt` (1-based).
    ///
    /// Saturates at `Duration::MAX` instead of overflowing.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::ZERO;
        }

        2u32.checked_pow(attempt - 1)
            .and_then(|factor| self.initial_delay.checked_mul(factor))
            .unwrap_or(Duration::MAX)
    }

    /// Check if another attempt should follow attempt number `attempt`
    pub fn should_retry(&self, attempt: u32) -> bool {
        attempt < self.max_attempts
    }
}
