//! Injectable wall clock for timestamps in results and digests.

use chrono::{DateTime, Utc};

/// Source of the current time.
pub trait Clock: Send + Sync {
    /// Current instant in UTC.
    fn now(&self) -> DateTime<Utc>;
}

/// Clock backed by the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock frozen at a single instant.
#[cfg(any(test, feature = "test-support"))]
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

#[cfg(any(test, feature = "test-support"))]
impl FixedClock {
    /// Freezes the clock at an RFC 3339 timestamp.
    ///
    /// # Panics
    ///
    /// Panics if `timestamp` is not valid RFC 3339; intended for fixtures.
    #[must_use]
    #[expect(clippy::expect_used, reason = "fixture helper with literal input")]
    pub fn at(timestamp: &str) -> Self {
        let instant = DateTime::parse_from_rfc3339(timestamp)
            .expect("fixture timestamp should be RFC 3339")
            .with_timezone(&Utc);
        Self(instant)
    }
}

#[cfg(any(test, feature = "test-support"))]
impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
