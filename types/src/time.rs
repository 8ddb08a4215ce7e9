//! Timestamp type and clock abstraction.
//!
//! Timestamps are Unix epoch seconds (UTC), matching the `uint64` unlock
//! times the controller contract stores.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// A Unix timestamp in seconds since epoch (UTC).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(u64);

impl Timestamp {
    /// The epoch (time zero). An unlock time of zero means "never staked".
    pub const EPOCH: Self = Self(0);

    pub fn new(secs: u64) -> Self {
        Self(secs)
    }

    /// Get the current system time as a `Timestamp`.
    ///
    /// A clock set before the epoch reads as the epoch itself.
    pub fn now() -> Self {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        Self(secs)
    }

    pub fn as_secs(&self) -> u64 {
        self.0
    }

    pub fn is_epoch(&self) -> bool {
        self.0 == 0
    }

    /// Seconds remaining until this timestamp, relative to `now` (zero once passed).
    pub fn remaining_from(&self, now: Timestamp) -> u64 {
        self.0.saturating_sub(now.0)
    }

    /// Whether this timestamp has been reached at `now` (inclusive).
    pub fn has_passed(&self, now: Timestamp) -> bool {
        now.0 >= self.0
    }

    pub fn saturating_add_secs(self, secs: u64) -> Self {
        Self(self.0.saturating_add(secs))
    }
}

impl From<u64> for Timestamp {
    fn from(secs: u64) -> Self {
        Self(secs)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}

/// Source of wall-clock time.
///
/// The data layer never calls [`Timestamp::now`] directly so tests can drive
/// lock countdowns with a deterministic clock.
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}

/// The real system clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remaining_saturates_after_unlock() {
        let unlock = Timestamp::new(1_000);
        assert_eq!(unlock.remaining_from(Timestamp::new(400)), 600);
        assert_eq!(unlock.remaining_from(Timestamp::new(1_000)), 0);
        assert_eq!(unlock.remaining_from(Timestamp::new(5_000)), 0);
    }

    #[test]
    fn has_passed_is_inclusive() {
        let t = Timestamp::new(42);
        assert!(!t.has_passed(Timestamp::new(41)));
        assert!(t.has_passed(Timestamp::new(42)));
        assert!(t.has_passed(Timestamp::new(43)));
    }

    #[test]
    fn epoch_detection() {
        assert!(Timestamp::EPOCH.is_epoch());
        assert!(!Timestamp::new(1).is_epoch());
    }
}
