//! Retry budget and backoff for outbound deliveries.

use std::time::Duration;

/// Exponential backoff with optional +/- 50% jitter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Backoff {
    pub base: Duration,
    pub factor: f64,
    pub max: Duration,
    pub jitter: bool,
}

impl Default for Backoff {
    fn default() -> Self {
        Self {
            base: Duration::from_millis(500),
            factor: 2.0,
            max: Duration::from_secs(5),
            jitter: true,
        }
    }
}

impl Backoff {
    /// Delay before retry number `attempt` (0-based).
    pub fn delay(self, attempt: u32) -> Duration {
        let scale = self.factor.powi(attempt.min(i32::MAX as u32) as i32);
        let seconds = (self.base.as_secs_f64() * scale).min(self.max.as_secs_f64());
        let delay = Duration::from_secs_f64(seconds);

        if !self.jitter {
            return delay;
        }

        let half_ms = delay.as_millis() as u64 / 2;
        let offset = fastrand::u64(0..=half_ms * 2);
        Duration::from_millis((delay.as_millis() as u64 - half_ms) + offset)
    }
}

/// How a publisher retries one delivery before giving up on it.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts = `max_retries + 1`.
    pub max_retries: u32,
    pub backoff: Backoff,
    /// Upper bound on a server-provided `retry_after` hint.
    pub max_retry_after: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            backoff: Backoff::default(),
            max_retry_after: Duration::from_secs(10),
        }
    }
}

impl RetryPolicy {
    /// Statuses that mean the server did not act on the request, so a
    /// non-idempotent POST can be sent again. 429 is handled separately.
    /// 500, 502 and 504 are excluded: the message may already be stored.
    pub const fn is_resendable_status(status: u16) -> bool {
        matches!(status, 408 | 503)
    }

    /// Delay to honour after a 429, preferring the server hint.
    pub fn rate_limit_delay(&self, retry_after: Option<Duration>, attempt: u32) -> Duration {
        retry_after
            .map(|hint| hint.min(self.max_retry_after))
            .unwrap_or_else(|| self.backoff.delay(attempt))
    }
}
