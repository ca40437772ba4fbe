//! Bridge settings
//!
//! Runtime configuration shared by the bridge core and its adapters.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Request-code offset the provider SDK uses for its activity results.
pub const DEFAULT_REQUEST_CODE_OFFSET: u32 = 0xface;

/// Bridge configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeSettings {
    /// Tracing filter directive, e.g. `info` or `idbridge_application=debug`.
    pub log_filter: String,
    /// Base URL of the provider's Graph API.
    pub graph_api_base_url: String,
    /// Graph API version segment.
    pub graph_api_version: String,
    /// Evict a pending login older than this many seconds when a new one arrives.
    ///
    /// `None` keeps a pending request until the provider reports back.
    pub stale_pending_after_secs: Option<u64>,
    /// Request-code offset forwarded activity results are tagged with.
    pub activity_request_code_offset: u32,
}

impl Default for BridgeSettings {
    fn default() -> Self {
        Self {
            log_filter: "info".to_string(),
            graph_api_base_url: "https://graph.facebook.com".to_string(),
            graph_api_version: "v19.0".to_string(),
            stale_pending_after_secs: None,
            activity_request_code_offset: DEFAULT_REQUEST_CODE_OFFSET,
        }
    }
}

impl BridgeSettings {
    /// Bound after which a pending request may be evicted, if configured.
    #[must_use]
    pub fn stale_pending_after(&self) -> Option<Duration> {
        self.stale_pending_after_secs.map(Duration::from_secs)
    }
}
