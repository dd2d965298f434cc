//! Buckets keyed by client identifier.

use std::time::Duration;

use dashmap::DashMap;

use super::bucket::TokenBucket;
use super::{Clock, Decision, Quota, SystemClock};

/// A token bucket per key, created lazily and shared across threads.
///
/// The map is sharded, so keys in different shards never contend. For a
/// single key, lookup-or-create, refill and consume all happen under that
/// shard's write lock: two first sightings of a key always end up sharing
/// one bucket, and concurrent callers never spend the same token twice.
///
/// Nothing is ever evicted unless [`retain_idle`](Self::retain_idle) is
/// called.
pub struct KeyedRateLimiter<C = SystemClock> {
    buckets: DashMap<String, TokenBucket>,
    quota: Quota,
    clock: C,
}

impl KeyedRateLimiter {
    /// Create a limiter on the system clock.
    pub fn new(quota: Quota) -> Self {
        Self::with_clock(quota, SystemClock)
    }
}

impl<C: Clock> KeyedRateLimiter<C> {
    /// Create a limiter reading time from `clock`.
    pub fn with_clock(quota: Quota, clock: C) -> Self {
        Self {
            buckets: DashMap::new(),
            quota,
            clock,
        }
    }

    /// Take a token from `key`'s bucket if one is available.
    ///
    /// Never blocks beyond the shard lock and never fails; running out of
    /// tokens is reported as [`Decision::Denied`].
    pub fn check(&self, key: &str) -> Decision {
        let now = self.clock.now();

        if let Some(mut bucket) = self.buckets.get_mut(key) {
            return bucket.try_acquire(&self.quota, now);
        }

        let mut bucket = self
            .buckets
            .entry(key.to_owned())
            .or_insert_with(|| TokenBucket::full(&self.quota, now));
        bucket.try_acquire(&self.quota, now)
    }

    /// Shorthand for `check(key).is_allowed()`.
    pub fn allow(&self, key: &str) -> bool {
        self.check(key).is_allowed()
    }

    /// Drop buckets untouched for at least `idle_ttl`. Returns how many went.
    ///
    /// With `idle_ttl >= quota.full_refill()` this cannot change any future
    /// decision: the dropped buckets would have been full again anyway.
    pub fn retain_idle(&self, idle_ttl: Duration) -> usize {
        let now = self.clock.now();
        let mut removed = 0;
        self.buckets.retain(|_, bucket| {
            let keep = now.saturating_duration_since(bucket.last_refill()) < idle_ttl;
            if !keep {
                removed += 1;
            }
            keep
        });
        removed
    }

    /// Number of keys currently tracked.
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn quota(&self) -> Quota {
        self.quota
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::limiter::ManualClock;
    use std::sync::Barrier;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn limiter(period_secs: u64, burst: u32) -> (KeyedRateLimiter<ManualClock>, ManualClock) {
        let clock = ManualClock::new();
        let quota = Quota::per_period(Duration::from_secs(period_secs), burst).unwrap();
        (KeyedRateLimiter::with_clock(quota, clock.clone()), clock)
    }

    #[test]
    fn one_per_minute() {
        let (limiter, clock) = limiter(60, 1);

        assert!(limiter.allow("10.0.0.1"));
        assert!(!limiter.allow("10.0.0.1"));

        clock.advance(Duration::from_secs(59));
        assert!(!limiter.allow("10.0.0.1"));

        clock.advance(Duration::from_secs(1));
        assert!(limiter.allow("10.0.0.1"));
        assert!(!limiter.allow("10.0.0.1"));
    }

    #[test]
    fn keys_do_not_share_capacity() {
        let (limiter, _clock) = limiter(60, 2);

        assert!(limiter.allow("a"));
        assert!(limiter.allow("a"));
        assert!(!limiter.allow("a"));

        assert!(limiter.allow("b"));
        assert!(limiter.allow("b"));
        assert!(!limiter.allow("b"));

        assert_eq!(limiter.len(), 2);
    }

    #[test]
    fn burst_of_ten() {
        let (limiter, _clock) = limiter(60, 10);

        let allowed = (0..15).filter(|_| limiter.allow("client")).count();
        assert_eq!(allowed, 10);
    }

    #[test]
    fn denial_reports_retry_after() {
        let (limiter, clock) = limiter(60, 1);
        assert!(limiter.allow("k"));

        clock.advance(Duration::from_secs(15));
        assert_eq!(
            limiter.check("k"),
            Decision::Denied {
                retry_after: Duration::from_secs(45)
            }
        );
    }

    #[test]
    fn denial_does_not_consume() {
        let (limiter, clock) = limiter(10, 1);
        assert!(limiter.allow("k"));

        // Hammering while empty must not push the next token further away.
        for _ in 0..100 {
            assert!(!limiter.allow("k"));
        }
        clock.advance(Duration::from_secs(10));
        assert!(limiter.allow("k"));
    }

    fn race(limiter: &KeyedRateLimiter<ManualClock>, callers: usize) -> usize {
        let barrier = Barrier::new(callers);
        let allowed = AtomicUsize::new(0);

        std::thread::scope(|scope| {
            for _ in 0..callers {
                scope.spawn(|| {
                    barrier.wait();
                    if limiter.allow("shared") {
                        allowed.fetch_add(1, Ordering::SeqCst);
                    }
                });
            }
        });

        allowed.into_inner()
    }

    #[test]
    fn concurrent_callers_get_exactly_burst() {
        let (limiter, _clock) = limiter(60, 16);
        assert_eq!(race(&limiter, 16), 16);
        assert_eq!(limiter.len(), 1);
    }

    #[test]
    fn one_extra_concurrent_caller_is_denied() {
        let (limiter, _clock) = limiter(60, 16);
        assert_eq!(race(&limiter, 17), 16);
        assert_eq!(limiter.len(), 1);
    }

    #[test]
    fn retain_idle_drops_only_idle_keys() {
        let (limiter, clock) = limiter(60, 1);
        assert!(limiter.allow("old"));

        clock.advance(Duration::from_secs(120));
        assert!(limiter.allow("fresh"));

        let removed = limiter.retain_idle(Duration::from_secs(60));
        assert_eq!(removed, 1);
        assert_eq!(limiter.len(), 1);

        // "fresh" kept its state: still empty.
        assert!(!limiter.allow("fresh"));
    }

    #[test]
    fn evicted_key_behaves_like_refilled_key() {
        let (limiter, clock) = limiter(60, 1);
        assert!(limiter.allow("k"));

        clock.advance(limiter.quota().full_refill());
        assert_eq!(limiter.retain_idle(limiter.quota().full_refill()), 1);
        assert!(limiter.is_empty());

        assert!(limiter.allow("k"));
        assert!(!limiter.allow("k"));
    }
}
