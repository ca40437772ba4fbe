//! The single in-flight authentication exchange.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::CallId;

/// Which operation a pending request belongs to.
///
/// Both kinds share the same slot; only one may be outstanding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PendingKind {
    /// Interactive login.
    Login,
    /// Data-access reauthorization.
    Reauthorize,
}

impl PendingKind {
    /// Returns the operation name as exposed to the host.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Reauthorize => "reauthorize",
        }
    }
}

impl fmt::Display for PendingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One caller-issued request awaiting a terminal provider event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingRequest {
    /// Host call the eventual outcome is delivered to.
    pub id: CallId,
    /// Operation that claimed the slot.
    pub kind: PendingKind,
    /// When the request was accepted.
    pub started_at: DateTime<Utc>,
}

impl PendingRequest {
    /// Creates a pending request accepted at `started_at`.
    #[must_use]
    pub const fn new(id: CallId, kind: PendingKind, started_at: DateTime<Utc>) -> Self {
        Self {
            id,
            kind,
            started_at,
        }
    }

    /// Whole seconds the request has been waiting as of `now`.
    #[must_use]
    pub fn waited_secs(&self, now: DateTime<Utc>) -> i64 {
        (now - self.started_at).num_seconds()
    }
}
