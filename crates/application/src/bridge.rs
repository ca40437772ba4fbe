//! Host-facing facade.
//!
//! [`AuthBridge`] owns the correlator and one instance of every use case, and
//! settles host calls through the [`HostBridge`] port. Login and
//! reauthorization are only accepted here; their resolution arrives later from
//! the SDK callback.

use std::sync::Arc;

use idbridge_domain::{BridgeCall, BridgeResult, BridgeSettings};
use serde_json::json;
use tracing::{debug, warn};

use crate::auth::Correlator;
use crate::ports::{
    ActivityResult, AppEvents, Clock, HostBridge, IdentitySdk, ProfileFetcher, settle,
};
use crate::use_cases::{
    GetCurrentAccessToken, GetProfile, Login, Logout, Reauthorize, RecordAppEvents,
};

/// Method names understood by [`AuthBridge::dispatch`].
pub mod methods {
    /// `initialize`
    pub const INITIALIZE: &str = "initialize";
    /// `login`
    pub const LOGIN: &str = "login";
    /// `logout`
    pub const LOGOUT: &str = "logout";
    /// `reauthorize`
    pub const REAUTHORIZE: &str = "reauthorize";
    /// `getCurrentAccessToken`
    pub const GET_CURRENT_ACCESS_TOKEN: &str = "getCurrentAccessToken";
    /// `getProfile`
    pub const GET_PROFILE: &str = "getProfile";
    /// `logEvent`
    pub const LOG_EVENT: &str = "logEvent";
    /// `setAutoLogAppEventsEnabled`
    pub const SET_AUTO_LOG_APP_EVENTS_ENABLED: &str = "setAutoLogAppEventsEnabled";
    /// `setAdvertiserIDCollectionEnabled`
    pub const SET_ADVERTISER_ID_COLLECTION_ENABLED: &str = "setAdvertiserIDCollectionEnabled";
}

/// Public operation surface of the bridge.
pub struct AuthBridge<F> {
    correlator: Arc<Correlator>,
    sdk: Arc<dyn IdentitySdk>,
    host: Arc<dyn HostBridge>,
    login: Login,
    reauthorize: Reauthorize,
    logout: Logout,
    current_token: GetCurrentAccessToken,
    profile: GetProfile<F>,
    app_events: RecordAppEvents,
}

impl<F: ProfileFetcher> AuthBridge<F> {
    /// Wires the bridge and registers its correlator with the SDK.
    pub fn new(
        sdk: Arc<dyn IdentitySdk>,
        host: Arc<dyn HostBridge>,
        clock: Arc<dyn Clock>,
        profiles: F,
        events: Arc<dyn AppEvents>,
        settings: &BridgeSettings,
    ) -> Self {
        debug!("wiring auth bridge");
        let correlator = Correlator::install_with_stale_bound(
            Arc::clone(&sdk),
            Arc::clone(&host),
            clock,
            settings.stale_pending_after(),
        );
        Self {
            login: Login::new(Arc::clone(&correlator)),
            reauthorize: Reauthorize::new(Arc::clone(&correlator)),
            logout: Logout::new(Arc::clone(&sdk)),
            current_token: GetCurrentAccessToken::new(Arc::clone(&sdk)),
            profile: GetProfile::new(Arc::clone(&sdk), profiles),
            app_events: RecordAppEvents::new(events),
            correlator,
            sdk,
            host,
        }
    }

    /// The correlator shared by login and reauthorization.
    #[must_use]
    pub const fn correlator(&self) -> &Arc<Correlator> {
        &self.correlator
    }

    /// Resolves immediately; present for host API compatibility.
    pub fn initialize(&self, call: &BridgeCall) {
        self.resolve_empty(call);
    }

    /// Accepts a login. Rejections (malformed arguments, overlap, refused
    /// start) are delivered at once; the outcome comes from the SDK callback.
    pub fn login(&self, call: &BridgeCall) {
        self.reject_on_error(call, self.login.execute(call));
    }

    /// Accepts a data-access reauthorization; see [`AuthBridge::login`].
    pub fn reauthorize(&self, call: &BridgeCall) {
        self.reject_on_error(call, self.reauthorize.execute(call));
    }

    /// Logs out and resolves with `{}`.
    pub fn logout(&self, call: &BridgeCall) {
        self.logout.execute();
        self.resolve_empty(call);
    }

    /// Resolves with the cached credential, if any.
    pub fn get_current_access_token(&self, call: &BridgeCall) {
        settle(self.host.as_ref(), &call.id, Ok(self.current_token.execute()));
    }

    /// Fetches the profile and settles the call with the provider's answer.
    pub async fn get_profile(&self, call: &BridgeCall) {
        let result = self.profile.execute(call).await;
        settle(self.host.as_ref(), &call.id, result);
    }

    /// Records an app event.
    pub fn log_event(&self, call: &BridgeCall) {
        self.app_events.log_event(call);
        self.resolve_empty(call);
    }

    /// Toggles automatic app-event logging.
    pub fn set_auto_log_app_events_enabled(&self, call: &BridgeCall) {
        self.app_events.set_auto_log_app_events_enabled(call);
        self.resolve_empty(call);
    }

    /// Toggles advertiser-id collection.
    pub fn set_advertiser_id_collection_enabled(&self, call: &BridgeCall) {
        self.app_events.set_advertiser_id_collection_enabled(call);
        self.resolve_empty(call);
    }

    /// Routes an external activity result to the SDK's own handler.
    ///
    /// Returns true if the SDK consumed it.
    pub fn handle_activity_result(&self, result: &ActivityResult) -> bool {
        debug!(
            request_code = result.request_code,
            result_code = result.result_code,
            "activity result"
        );
        let consumed = self.sdk.handle_activity_result(result);
        if consumed {
            debug!("activity result consumed by the SDK");
        } else {
            warn!("activity result not handled by the SDK");
        }
        consumed
    }

    /// Routes a host call by method name.
    pub async fn dispatch(&self, method: &str, call: &BridgeCall) {
        match method {
            methods::INITIALIZE => self.initialize(call),
            methods::LOGIN => self.login(call),
            methods::LOGOUT => self.logout(call),
            methods::REAUTHORIZE => self.reauthorize(call),
            methods::GET_CURRENT_ACCESS_TOKEN => self.get_current_access_token(call),
            methods::GET_PROFILE => self.get_profile(call).await,
            methods::LOG_EVENT => self.log_event(call),
            methods::SET_AUTO_LOG_APP_EVENTS_ENABLED => self.set_auto_log_app_events_enabled(call),
            methods::SET_ADVERTISER_ID_COLLECTION_ENABLED => {
                self.set_advertiser_id_collection_enabled(call);
            }
            other => {
                warn!(method = other, call = %call.id, "unknown method");
                self.host
                    .reject(&call.id, &format!("method not implemented: {other}"));
            }
        }
    }

    fn resolve_empty(&self, call: &BridgeCall) {
        self.host.resolve(&call.id, json!({}));
    }

    fn reject_on_error(&self, call: &BridgeCall, accepted: BridgeResult<()>) {
        if let Err(err) = accepted {
            self.host.reject(&call.id, &err.to_string());
        }
    }
}

impl<F> std::fmt::Debug for AuthBridge<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthBridge")
            .field("state", &self.correlator.state())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::auth::SlotState;
    use crate::use_cases::test_support::{
        FixedClock, MockEvents, MockHost, MockSdk, StubProfiles, token,
    };
    use chrono::{TimeZone, Utc};
    use idbridge_domain::{CallId, LoginResult, PendingKind};
    use pretty_assertions::assert_eq;

    struct Harness {
        sdk: Arc<MockSdk>,
        host: Arc<MockHost>,
        events: Arc<MockEvents>,
        bridge: AuthBridge<StubProfiles>,
    }

    fn harness(sdk: MockSdk) -> Harness {
        let sdk = Arc::new(sdk);
        let host = Arc::new(MockHost::default());
        let events = Arc::new(MockEvents::default());
        let bridge = AuthBridge::new(
            sdk.clone(),
            host.clone(),
            Arc::new(FixedClock(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap())),
            StubProfiles::answering(Ok(json!({ "id": "42", "name": "Ada" }))),
            events.clone(),
            &BridgeSettings::default(),
        );
        Harness {
            sdk,
            host,
            events,
            bridge,
        }
    }

    #[tokio::test]
    async fn test_login_then_sdk_success_resolves_caller() {
        let h = harness(MockSdk::default());
        let call = BridgeCall::new("cb-1", json!({ "permissions": ["email"] }));
        h.bridge.dispatch(methods::LOGIN, &call).await;
        assert!(h.host.settled().is_empty());
        assert_eq!(
            h.bridge.correlator().state(),
            SlotState::Pending {
                id: CallId::from("cb-1"),
                kind: PendingKind::Login
            }
        );

        h.sdk
            .callback()
            .on_success(LoginResult::new(token(false), ["email"], Vec::<String>::new()));

        let settled = h.host.settled();
        assert_eq!(settled.len(), 1);
        let value = settled[0].1.as_ref().unwrap();
        assert_eq!(value["recentlyGrantedPermissions"], json!(["email"]));
        assert_eq!(value["recentlyDeniedPermissions"], json!([]));
        assert_eq!(value["accessToken"]["token"], json!("EAAB"));
    }

    #[tokio::test]
    async fn test_overlapping_login_rejected_first_still_resolves() {
        let h = harness(MockSdk::default());
        let first = BridgeCall::new("cb-1", json!({ "permissions": ["email"] }));
        let second = BridgeCall::new("cb-2", json!({ "permissions": ["email"] }));
        h.bridge.dispatch(methods::LOGIN, &first).await;
        h.bridge.dispatch(methods::LOGIN, &second).await;

        assert_eq!(
            h.host.settled(),
            vec![(
                CallId::from("cb-2"),
                Err("Overlapped calls not supported".to_string())
            )]
        );

        h.sdk.callback().on_cancel();
        let settled = h.host.settled();
        assert_eq!(settled.len(), 2);
        assert_eq!(settled[1], (CallId::from("cb-1"), Ok(json!({ "accessToken": null }))));
    }

    #[tokio::test]
    async fn test_malformed_login_rejected() {
        let h = harness(MockSdk::default());
        h.bridge
            .dispatch(methods::LOGIN, &BridgeCall::without_args("cb-1"))
            .await;
        assert_eq!(
            h.host.settled(),
            vec![(
                CallId::from("cb-1"),
                Err("Invalid permissions argument".to_string())
            )]
        );
        assert!(!h.bridge.correlator().is_pending());
    }

    #[tokio::test]
    async fn test_pass_through_operations_resolve_empty() {
        let h = harness(MockSdk::with_token(token(false)));
        h.bridge
            .dispatch(methods::INITIALIZE, &BridgeCall::without_args("cb-0"))
            .await;
        h.bridge
            .dispatch(methods::LOGOUT, &BridgeCall::without_args("cb-1"))
            .await;
        h.bridge
            .dispatch(
                methods::LOG_EVENT,
                &BridgeCall::new("cb-2", json!({ "eventName": "tutorial_done" })),
            )
            .await;
        h.bridge
            .dispatch(
                methods::SET_AUTO_LOG_APP_EVENTS_ENABLED,
                &BridgeCall::new("cb-3", json!({ "enabled": true })),
            )
            .await;
        h.bridge
            .dispatch(
                methods::SET_ADVERTISER_ID_COLLECTION_ENABLED,
                &BridgeCall::new("cb-4", json!({ "enabled": false })),
            )
            .await;

        let settled = h.host.settled();
        assert_eq!(settled.len(), 5);
        assert!(settled.iter().all(|(_, result)| result == &Ok(json!({}))));
        assert_eq!(*h.sdk.logouts.lock().unwrap(), 1);
        assert_eq!(*h.events.events.lock().unwrap(), vec!["tutorial_done".to_string()]);
        assert_eq!(*h.events.auto_log.lock().unwrap(), Some(true));
        assert_eq!(*h.events.advertiser_id.lock().unwrap(), Some(false));
    }

    #[tokio::test]
    async fn test_current_token_absent_then_present() {
        let h = harness(MockSdk::default());
        h.bridge
            .dispatch(methods::GET_CURRENT_ACCESS_TOKEN, &BridgeCall::without_args("cb-1"))
            .await;
        *h.sdk.token.lock().unwrap() = Some(token(false));
        h.bridge
            .dispatch(methods::GET_CURRENT_ACCESS_TOKEN, &BridgeCall::without_args("cb-2"))
            .await;

        let settled = h.host.settled();
        assert_eq!(settled[0].1, Ok(json!({})));
        assert_eq!(
            settled[1].1.as_ref().unwrap()["accessToken"]["userId"],
            json!("42")
        );
    }

    #[tokio::test]
    async fn test_get_profile_settles() {
        let h = harness(MockSdk::default());
        let call = BridgeCall::new("cb-1", json!({ "fields": ["id", "name"] }));
        h.bridge.dispatch(methods::GET_PROFILE, &call).await;
        *h.sdk.token.lock().unwrap() = Some(token(false));
        h.bridge.dispatch(methods::GET_PROFILE, &call).await;

        let settled = h.host.settled();
        assert!(settled[0].1.as_ref().unwrap_err().contains("not logged in"));
        assert_eq!(settled[1].1, Ok(json!({ "id": "42", "name": "Ada" })));
    }

    #[tokio::test]
    async fn test_unknown_method_rejected() {
        let h = harness(MockSdk::default());
        h.bridge
            .dispatch("shareDialog", &BridgeCall::without_args("cb-1"))
            .await;
        assert_eq!(
            h.host.settled(),
            vec![(
                CallId::from("cb-1"),
                Err("method not implemented: shareDialog".to_string())
            )]
        );
    }

    #[test]
    fn test_activity_result_forwarded_uninterpreted() {
        let h = harness(MockSdk::default());
        let result = ActivityResult {
            request_code: 0xface,
            result_code: -1,
            data: Some(json!({ "opaque": true })),
        };
        assert!(h.bridge.handle_activity_result(&result));
        assert!(!h.bridge.handle_activity_result(&ActivityResult {
            request_code: 1,
            result_code: 0,
            data: None,
        }));
        assert_eq!(h.sdk.activity_results.lock().unwrap()[0], result);
    }
}
