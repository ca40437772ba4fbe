//! Wall-clock adapter

use chrono::{DateTime, SubsecRound, Utc};
use idbridge_application::ports::Clock;

/// [`Clock`] reading the host's wall clock.
///
/// Readings are truncated to whole milliseconds, the precision of every
/// timestamp the bridge hands to callers.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl SystemClock {
    /// Creates the adapter.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now().trunc_subsecs(3)
    }
}
