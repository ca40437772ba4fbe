//! Wall-clock port

use chrono::{DateTime, Utc};

/// Source of the instants pending requests are stamped with.
///
/// Stale eviction compares two readings of the same clock, so an
/// implementation only needs to be monotonic within one bridge.
pub trait Clock: Send + Sync {
    /// Current instant in UTC.
    fn now(&self) -> DateTime<Utc>;
}
