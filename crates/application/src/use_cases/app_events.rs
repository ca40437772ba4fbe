//! App-event and data-collection flag pass-throughs

use std::sync::Arc;

use idbridge_domain::BridgeCall;
use tracing::debug;

use crate::ports::AppEvents;

/// Fire-and-forget calls into the provider's event logger.
///
/// Missing arguments are ignored rather than rejected.
pub struct RecordAppEvents {
    events: Arc<dyn AppEvents>,
}

impl RecordAppEvents {
    /// Creates a new `RecordAppEvents` use case.
    #[must_use]
    pub fn new(events: Arc<dyn AppEvents>) -> Self {
        Self { events }
    }

    /// Logs `eventName`, if present.
    pub fn log_event(&self, call: &BridgeCall) {
        debug!("log_event");
        if let Some(name) = call.string("eventName") {
            self.events.log_event(name);
        }
    }

    /// Applies `enabled` to automatic app-event logging, if present.
    pub fn set_auto_log_app_events_enabled(&self, call: &BridgeCall) {
        debug!("set_auto_log_app_events_enabled");
        if let Some(enabled) = call.bool("enabled") {
            self.events.set_auto_log_app_events_enabled(enabled);
        }
    }

    /// Applies `enabled` to advertiser-id collection, if present.
    pub fn set_advertiser_id_collection_enabled(&self, call: &BridgeCall) {
        debug!("set_advertiser_id_collection_enabled");
        if let Some(enabled) = call.bool("enabled") {
            self.events.set_advertiser_id_collection_enabled(enabled);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::use_cases::test_support::MockEvents;
    use serde_json::json;

    #[test]
    fn test_log_event_requires_name() {
        let events = Arc::new(MockEvents::default());
        let use_case = RecordAppEvents::new(events.clone());

        use_case.log_event(&BridgeCall::new("cb-1", json!({ "eventName": "fb_mobile_purchase" })));
        use_case.log_event(&BridgeCall::without_args("cb-2"));

        assert_eq!(*events.events.lock().unwrap(), vec!["fb_mobile_purchase".to_string()]);
    }

    #[test]
    fn test_flags() {
        let events = Arc::new(MockEvents::default());
        let use_case = RecordAppEvents::new(events.clone());

        use_case.set_auto_log_app_events_enabled(&BridgeCall::new("cb-1", json!({ "enabled": false })));
        use_case.set_advertiser_id_collection_enabled(&BridgeCall::new("cb-2", json!({ "enabled": true })));
        use_case.set_advertiser_id_collection_enabled(&BridgeCall::new("cb-3", json!({ "enabled": "yes" })));

        assert_eq!(*events.auto_log.lock().unwrap(), Some(false));
        assert_eq!(*events.advertiser_id.lock().unwrap(), Some(true));
    }
}
