//! A single token bucket.

use std::time::{Duration, Instant};

use super::Quota;

/// Outcome of asking a bucket for a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// A token was consumed.
    Allowed,

    /// No whole token was available; one will be after `retry_after`.
    Denied { retry_after: Duration },
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allowed)
    }
}

/// Token count and the instant it was last brought up to date.
///
/// `tokens` stays within `[0, quota.burst()]`. `last_refill` never moves
/// backwards, even if callers pass instants out of order.
#[derive(Debug, Clone)]
pub(crate) struct TokenBucket {
    tokens: f64,
    last_refill: Instant,
}

impl TokenBucket {
    /// A bucket holding its full burst.
    pub(crate) fn full(quota: &Quota, now: Instant) -> Self {
        Self {
            tokens: f64::from(quota.burst()),
            last_refill: now,
        }
    }

    /// Refill for the time elapsed since the last call, then try to take one token.
    pub(crate) fn try_acquire(&mut self, quota: &Quota, now: Instant) -> Decision {
        self.refill(quota, now);

        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            return Decision::Allowed;
        }

        let missing = 1.0 - self.tokens;
        Decision::Denied {
            retry_after: quota.period().mul_f64(missing),
        }
    }

    pub(crate) fn last_refill(&self) -> Instant {
        self.last_refill
    }

    fn refill(&mut self, quota: &Quota, now: Instant) {
        if now <= self.last_refill {
            return;
        }
        let earned = (now - self.last_refill).as_secs_f64() / quota.period().as_secs_f64();
        self.tokens = (self.tokens + earned).min(f64::from(quota.burst()));
        self.last_refill = now;
    }
}
