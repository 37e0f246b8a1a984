//! Retry policy for rate-limited requests

use std::time::Duration;

/// Overpass asks for a short pause when rate limiting; one second is enough
pub const DEFAULT_RETRY_INTERVAL: Duration = Duration::from_secs(1);

/// Delay schedule between attempts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backoff {
    Fixed(Duration),
    /// `base * 2^(retry - 1)`, capped at `max`
    Exponential { base: Duration, max: Duration },
}

/// How often and how patiently to retry a rate-limited request.
///
/// The default retries forever at a fixed one-second interval. A persistently
/// rate-limited endpoint therefore hangs the caller; use [`RetryPolicy::bounded`]
/// when that is not acceptable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first one. `None` = unbounded.
    pub max_attempts: Option<u32>,
    pub backoff: Backoff,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy::unbounded(DEFAULT_RETRY_INTERVAL)
    }
}

impl RetryPolicy {
    pub fn unbounded(interval: Duration) -> Self {
        RetryPolicy {
            max_attempts: None,
            backoff: Backoff::Fixed(interval),
        }
    }

    pub fn bounded(max_attempts: u32, interval: Duration) -> Self {
        RetryPolicy {
            max_attempts: Some(max_attempts.max(1)),
            backoff: Backoff::Fixed(interval),
        }
    }

    pub fn with_backoff(self, backoff: Backoff) -> Self {
        RetryPolicy { backoff, ..self }
    }

    /// Whether another attempt is allowed after `attempts` have been made
    pub fn allows_retry(&self, attempts: u32) -> bool {
        match self.max_attempts {
            Some(max) => attempts < max,
            None => true,
        }
    }

    /// Delay before retry number `retry` (1-based)
    pub fn delay_for(&self, retry: u32) -> Duration {
        match self.backoff {
            Backoff::Fixed(interval) => interval,
            Backoff::Exponential { base, max } => {
                let factor = 2u32.saturating_pow(retry.saturating_sub(1));
                base.saturating_mul(factor).min(max)
            }
        }
    }
}
