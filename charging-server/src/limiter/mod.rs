//! Per-key token bucket rate limiting.
//!
//! Each client key (normally an IP address) gets its own bucket, created
//! full the first time the key is seen. Buckets refill continuously at the
//! quota's rate and are capped at its burst size.

mod bucket;
mod clock;
mod keyed;
mod quota;

pub use bucket::Decision;
pub use clock::{Clock, ManualClock, SystemClock};
pub use keyed::KeyedRateLimiter;
pub use quota::{InvalidQuota, Quota};
