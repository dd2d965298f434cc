//! Rate limit quotas.

use std::time::Duration;

/// Error returned when building a quota from unusable values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum InvalidQuota {
    #[error("burst must be at least 1")]
    ZeroBurst,

    #[error("refill period must be non-zero")]
    ZeroPeriod,
}

/// How many requests a key may make: one token every `period`, holding at
/// most `burst` tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quota {
    period: Duration,
    burst: u32,
}

impl Quota {
    /// One token per `period`, up to `burst` banked.
    pub fn per_period(period: Duration, burst: u32) -> Result<Self, InvalidQuota> {
        if burst == 0 {
            return Err(InvalidQuota::ZeroBurst);
        }
        if period.is_zero() {
            return Err(InvalidQuota::ZeroPeriod);
        }
        Ok(Self { period, burst })
    }

    /// Time to earn one token.
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Bucket capacity.
    pub fn burst(&self) -> u32 {
        self.burst
    }

    /// Time for an empty bucket to fill completely.
    ///
    /// A bucket left alone this long is indistinguishable from a new one.
    pub fn full_refill(&self) -> Duration {
        self.period.saturating_mul(self.burst)
    }
}
