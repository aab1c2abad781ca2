//! Clock abstraction.
//!
//! Every deadline is computed from an injected [`Clock`] so that expiry can be
//! exercised in tests without sleeping for the full hold TTL.

use crate::domain::Timestamp;

/// Source of the current time.
pub trait Clock: Send + Sync {
    /// Current Unix timestamp in milliseconds.
    fn now(&self) -> Timestamp;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::new(seatlock_shared::time::now_millis())
    }
}

#[cfg(test)]
pub use manual::ManualClock;
