//! Pending-call correlator.
//!
//! Binds one host call to the next terminal event emitted by the SDK's login
//! callback. Only one login or reauthorization may be outstanding; a second
//! attempt is rejected synchronously and the first one is left untouched.
//!
//! Terminal events may arrive on any thread, including inline while
//! [`Correlator::begin_login`] is still starting the SDK flow. The slot lock is
//! never held across a call into the SDK or the host bridge.
//!
//! With a stale bound configured, an evicted request's flow is still running
//! inside the SDK. The next terminal event after each eviction is attributed
//! to that flow and dropped.

use std::collections::BTreeSet;
use std::sync::{Arc, Weak};
use std::time::Duration;

use chrono::{DateTime, Utc};
use idbridge_domain::{
    AuthOutcome, BridgeError, BridgeResult, CallId, LoginResult, PendingKind, PendingRequest,
};
use parking_lot::Mutex;
use tracing::{debug, error, warn};

use super::{hash_nonce, normalize_login};
use crate::ports::{
    Clock, HostBridge, IdentitySdk, LoginCallback, LoginConfiguration, SdkError, settle,
};

/// Observable state of the pending slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotState {
    /// No exchange outstanding.
    Idle,
    /// Waiting for the SDK to report back.
    Pending {
        /// Call the outcome will be delivered to.
        id: CallId,
        /// Operation that claimed the slot.
        kind: PendingKind,
    },
}

impl SlotState {
    /// Check if an exchange is outstanding.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self, Self::Pending { .. })
    }
}

/// Contents of the slot lock.
#[derive(Debug, Default)]
struct Slot {
    pending: Option<PendingRequest>,
    /// Evicted flows whose terminal event has not arrived yet.
    orphaned: usize,
}

/// Single-slot registry of the in-flight authentication exchange.
pub struct Correlator {
    slot: Mutex<Slot>,
    sdk: Arc<dyn IdentitySdk>,
    host: Arc<dyn HostBridge>,
    clock: Arc<dyn Clock>,
    stale_after: Option<chrono::Duration>,
}

impl Correlator {
    /// Creates a correlator and registers it as the SDK's login callback.
    ///
    /// Construct once at startup and share the returned handle.
    pub fn install(
        sdk: Arc<dyn IdentitySdk>,
        host: Arc<dyn HostBridge>,
        clock: Arc<dyn Clock>,
    ) -> Arc<Self> {
        Self::install_with_stale_bound(sdk, host, clock, None)
    }

    /// Like [`Correlator::install`], but a `begin_*` call may evict a pending
    /// request that has waited at least `stale_after`.
    pub fn install_with_stale_bound(
        sdk: Arc<dyn IdentitySdk>,
        host: Arc<dyn HostBridge>,
        clock: Arc<dyn Clock>,
        stale_after: Option<Duration>,
    ) -> Arc<Self> {
        let correlator = Arc::new(Self {
            slot: Mutex::new(Slot::default()),
            sdk: Arc::clone(&sdk),
            host,
            clock,
            stale_after: stale_after.and_then(stale_bound),
        });
        // Weak so the SDK's registration does not keep the correlator alive.
        sdk.register_callback(Arc::new(CallbackHandle(Arc::downgrade(&correlator))));
        correlator
    }

    /// Accepts a login for `id` and starts the SDK flow.
    ///
    /// A non-empty `nonce` is hashed before it reaches the SDK.
    ///
    /// # Errors
    /// [`BridgeError::Overlap`] if an exchange is already outstanding, or
    /// [`BridgeError::Provider`] if the SDK refused to start the flow.
    pub fn begin_login(
        &self,
        id: CallId,
        permissions: BTreeSet<String>,
        nonce: Option<&str>,
    ) -> BridgeResult<()> {
        self.claim(&id, PendingKind::Login)?;

        let configuration = match nonce.filter(|nonce| !nonce.is_empty()) {
            Some(nonce) => LoginConfiguration::with_nonce(permissions, hash_nonce(nonce)),
            None => LoginConfiguration::new(permissions),
        };
        let started = self.sdk.log_in(configuration);
        self.release_on_failure(&id, started)
    }

    /// Accepts a data-access reauthorization for `id` and starts the SDK flow.
    ///
    /// # Errors
    /// Same as [`Correlator::begin_login`].
    pub fn begin_reauthorize(&self, id: CallId) -> BridgeResult<()> {
        self.claim(&id, PendingKind::Reauthorize)?;

        let started = self.sdk.reauthorize_data_access();
        self.release_on_failure(&id, started)
    }

    /// SDK success callback: resolves the pending caller with the normalized result.
    pub fn on_sdk_success(&self, result: LoginResult) {
        debug!("login callback: success");
        let Some(pending) = self.take_pending("on_success") else {
            return;
        };
        settle(
            self.host.as_ref(),
            &pending.id,
            normalize_login(&result).into_response(),
        );
    }

    /// SDK cancel callback: resolves the pending caller with an absent token.
    pub fn on_sdk_cancel(&self) {
        debug!("login callback: cancel");
        let Some(pending) = self.take_pending("on_cancel") else {
            return;
        };
        settle(
            self.host.as_ref(),
            &pending.id,
            AuthOutcome::Cancelled.into_response(),
        );
    }

    /// SDK error callback: rejects the pending caller with the provider's description.
    pub fn on_sdk_error(&self, error: SdkError) {
        error!(error = %error, "login callback: error");
        let Some(pending) = self.take_pending("on_error") else {
            return;
        };
        let outcome = AuthOutcome::Failed {
            message: error.description,
        };
        settle(self.host.as_ref(), &pending.id, outcome.into_response());
    }

    /// Returns the current slot state.
    #[must_use]
    pub fn state(&self) -> SlotState {
        self.slot
            .lock()
            .pending
            .as_ref()
            .map_or(SlotState::Idle, |pending| SlotState::Pending {
                id: pending.id.clone(),
                kind: pending.kind,
            })
    }

    /// Check if an exchange is outstanding.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.slot.lock().pending.is_some()
    }

    /// Atomically checks the slot and stores the new request.
    fn claim(&self, id: &CallId, kind: PendingKind) -> BridgeResult<()> {
        let now = self.clock.now();
        let evicted = {
            let mut slot = self.slot.lock();
            if let Some(current) = slot.pending.as_ref()
                && !self.is_stale(current, now)
            {
                warn!(
                    pending = %current.id,
                    pending_kind = %current.kind,
                    rejected = %id,
                    "{kind}: overlapped calls not supported"
                );
                return Err(BridgeError::Overlap);
            }
            let evicted = slot
                .pending
                .replace(PendingRequest::new(id.clone(), kind, now));
            if evicted.is_some() {
                slot.orphaned += 1;
            }
            evicted
        };

        if let Some(stale) = evicted {
            let waited_secs = stale.waited_secs(now);
            warn!(
                evicted = %stale.id,
                waited_secs,
                "evicting stale {} call in favour of {id}",
                stale.kind
            );
            let err = BridgeError::StalePending {
                id: stale.id.clone(),
                kind: stale.kind,
                waited_secs,
            };
            self.host.reject(&stale.id, &err.to_string());
        }
        debug!(call = %id, "{kind}: pending");
        Ok(())
    }

    fn is_stale(&self, pending: &PendingRequest, now: DateTime<Utc>) -> bool {
        self.stale_after
            .is_some_and(|bound| now - pending.started_at >= bound)
    }

    /// Frees the slot if the SDK could not start the flow.
    ///
    /// A callback that already consumed the slot has settled the call, so the
    /// refusal is only logged.
    fn release_on_failure(&self, id: &CallId, started: Result<(), SdkError>) -> BridgeResult<()> {
        let Err(err) = started else {
            return Ok(());
        };
        error!(call = %id, error = %err, "provider refused to start the flow");
        {
            let mut slot = self.slot.lock();
            if !slot.pending.as_ref().is_some_and(|pending| &pending.id == id) {
                warn!(call = %id, "flow refused after its outcome was already delivered");
                return Ok(());
            }
            slot.pending = None;
        }
        Err(BridgeError::Provider(err.description))
    }

    fn take_pending(&self, event: &str) -> Option<PendingRequest> {
        let mut slot = self.slot.lock();
        if slot.orphaned > 0 {
            slot.orphaned -= 1;
            warn!(
                remaining = slot.orphaned,
                "{event}: dropping outcome of an evicted flow"
            );
            return None;
        }
        let pending = slot.pending.take();
        drop(slot);
        if pending.is_none() {
            error!("{event}: no pending call found");
        }
        pending
    }
}

fn stale_bound(bound: Duration) -> Option<chrono::Duration> {
    let converted = chrono::Duration::from_std(bound).ok();
    if converted.is_none() {
        warn!(
            secs = bound.as_secs(),
            "stale pending bound out of range, eviction disabled"
        );
    }
    converted
}

impl LoginCallback for Correlator {
    fn on_success(&self, result: LoginResult) {
        self.on_sdk_success(result);
    }

    fn on_cancel(&self) {
        self.on_sdk_cancel();
    }

    fn on_error(&self, error: SdkError) {
        self.on_sdk_error(error);
    }
}

/// Registration handed to the SDK; forwards to the correlator while it lives.
struct CallbackHandle(Weak<Correlator>);

impl LoginCallback for CallbackHandle {
    fn on_success(&self, result: LoginResult) {
        match self.0.upgrade() {
            Some(correlator) => correlator.on_sdk_success(result),
            None => warn!("login success delivered after the bridge shut down"),
        }
    }

    fn on_cancel(&self) {
        match self.0.upgrade() {
            Some(correlator) => correlator.on_sdk_cancel(),
            None => warn!("login cancel delivered after the bridge shut down"),
        }
    }

    fn on_error(&self, error: SdkError) {
        match self.0.upgrade() {
            Some(correlator) => correlator.on_sdk_error(error),
            None => warn!(error = %error, "login error delivered after the bridge shut down"),
        }
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::significant_drop_tightening
)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use idbridge_domain::AccessToken;
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};
    use std::sync::Mutex as StdMutex;
    use std::thread;

    type Settled = Vec<(CallId, Result<Value, String>)>;

    #[derive(Default)]
    struct MockHost {
        settled: StdMutex<Settled>,
    }

    impl MockHost {
        fn settled(&self) -> Settled {
            self.settled.lock().expect("Lock poisoned").clone()
        }
    }

    impl HostBridge for MockHost {
        fn resolve(&self, id: &CallId, value: Value) {
            self.settled
                .lock()
                .expect("Lock poisoned")
                .push((id.clone(), Ok(value)));
        }

        fn reject(&self, id: &CallId, message: &str) {
            self.settled
                .lock()
                .expect("Lock poisoned")
                .push((id.clone(), Err(message.to_string())));
        }
    }

    /// What the mock SDK does when a flow is started.
    #[derive(Clone, Copy, Default)]
    enum OnStart {
        #[default]
        Wait,
        Refuse,
        SucceedInline,
        FailInlineThenRefuse,
    }

    #[derive(Default)]
    struct MockSdk {
        callback: StdMutex<Option<Arc<dyn LoginCallback>>>,
        logins: StdMutex<Vec<LoginConfiguration>>,
        reauthorizations: StdMutex<usize>,
        on_start: StdMutex<OnStart>,
    }

    impl MockSdk {
        fn callback(&self) -> Arc<dyn LoginCallback> {
            self.callback
                .lock()
                .expect("Lock poisoned")
                .clone()
                .expect("callback registered")
        }

        fn set_on_start(&self, on_start: OnStart) {
            *self.on_start.lock().expect("Lock poisoned") = on_start;
        }

        fn start(&self) -> Result<(), SdkError> {
            let on_start = *self.on_start.lock().expect("Lock poisoned");
            match on_start {
                OnStart::Wait => Ok(()),
                OnStart::Refuse => Err(SdkError::new("activity unavailable")),
                OnStart::SucceedInline => {
                    self.callback()
                        .on_success(LoginResult::new(token(), ["email"], Vec::<String>::new()));
                    Ok(())
                }
                OnStart::FailInlineThenRefuse => {
                    self.callback().on_error(SdkError::new("inline failure"));
                    Err(SdkError::new("start refused"))
                }
            }
        }
    }

    impl IdentitySdk for MockSdk {
        fn register_callback(&self, callback: Arc<dyn LoginCallback>) {
            *self.callback.lock().expect("Lock poisoned") = Some(callback);
        }

        fn log_in(&self, configuration: LoginConfiguration) -> Result<(), SdkError> {
            self.logins.lock().expect("Lock poisoned").push(configuration);
            self.start()
        }

        fn reauthorize_data_access(&self) -> Result<(), SdkError> {
            *self.reauthorizations.lock().expect("Lock poisoned") += 1;
            self.start()
        }

        fn log_out(&self) {}

        fn current_access_token(&self) -> Option<AccessToken> {
            None
        }

        fn handle_activity_result(&self, _: &crate::ports::ActivityResult) -> bool {
            false
        }
    }

    struct SteppingClock {
        now: StdMutex<DateTime<Utc>>,
    }

    impl SteppingClock {
        fn new() -> Self {
            Self {
                now: StdMutex::new(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()),
            }
        }

        fn advance(&self, secs: i64) {
            *self.now.lock().expect("Lock poisoned") += chrono::Duration::seconds(secs);
        }
    }

    impl Clock for SteppingClock {
        fn now(&self) -> DateTime<Utc> {
            *self.now.lock().expect("Lock poisoned")
        }
    }

    fn token() -> AccessToken {
        AccessToken {
            application_id: "app".to_string(),
            token: "tok".to_string(),
            user_id: "u1".to_string(),
            permissions: BTreeSet::from(["email".to_string()]),
            declined_permissions: BTreeSet::new(),
            expires: Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap(),
            last_refresh: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            expired: false,
        }
    }

    fn permissions(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    struct Fixture {
        sdk: Arc<MockSdk>,
        host: Arc<MockHost>,
        clock: Arc<SteppingClock>,
        correlator: Arc<Correlator>,
    }

    fn fixture(stale_after: Option<Duration>) -> Fixture {
        let sdk = Arc::new(MockSdk::default());
        let host = Arc::new(MockHost::default());
        let clock = Arc::new(SteppingClock::new());
        let correlator = Correlator::install_with_stale_bound(
            sdk.clone(),
            host.clone(),
            clock.clone(),
            stale_after,
        );
        Fixture {
            sdk,
            host,
            clock,
            correlator,
        }
    }

    #[test]
    fn test_begin_login_stores_pending_and_starts_flow() {
        let f = fixture(None);
        f.correlator
            .begin_login(CallId::from("cb-1"), permissions(&["email"]), None)
            .unwrap();

        assert_eq!(
            f.correlator.state(),
            SlotState::Pending {
                id: CallId::from("cb-1"),
                kind: PendingKind::Login
            }
        );
        let logins = f.sdk.logins.lock().unwrap();
        assert_eq!(logins[0], LoginConfiguration::new(permissions(&["email"])));
        assert!(f.host.settled().is_empty());
    }

    #[test]
    fn test_nonce_is_hashed_and_empty_nonce_dropped() {
        let f = fixture(None);
        f.correlator
            .begin_login(CallId::from("cb-1"), permissions(&[]), Some("abc"))
            .unwrap();
        f.correlator.on_sdk_cancel();
        f.correlator
            .begin_login(CallId::from("cb-2"), permissions(&[]), Some(""))
            .unwrap();

        let logins = f.sdk.logins.lock().unwrap();
        assert_eq!(
            logins[0].nonce.as_deref(),
            Some("ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad")
        );
        assert_eq!(logins[1].nonce, None);
    }

    #[test]
    fn test_overlap_rejected_without_touching_slot() {
        let f = fixture(None);
        f.correlator
            .begin_login(CallId::from("cb-1"), permissions(&["email"]), None)
            .unwrap();

        let second = f
            .correlator
            .begin_login(CallId::from("cb-2"), permissions(&["email"]), None);
        assert_eq!(second, Err(BridgeError::Overlap));
        assert_eq!(
            f.correlator.begin_reauthorize(CallId::from("cb-3")),
            Err(BridgeError::Overlap)
        );
        assert_eq!(f.sdk.logins.lock().unwrap().len(), 1);
        assert_eq!(*f.sdk.reauthorizations.lock().unwrap(), 0);

        f.correlator
            .on_sdk_success(LoginResult::new(token(), ["email"], Vec::<String>::new()));
        let settled = f.host.settled();
        assert_eq!(settled.len(), 1);
        assert_eq!(settled[0].0, CallId::from("cb-1"));
        assert!(settled[0].1.is_ok());
    }

    #[test]
    fn test_success_resolves_normalized_envelope() {
        let f = fixture(None);
        f.correlator
            .begin_login(CallId::from("cb-1"), permissions(&["email"]), None)
            .unwrap();
        f.correlator
            .on_sdk_success(LoginResult::new(token(), ["email"], Vec::<String>::new()));

        assert_eq!(
            f.host.settled(),
            vec![(
                CallId::from("cb-1"),
                Ok(json!({
                    "accessToken": {
                        "applicationId": "app",
                        "token": "tok",
                        "userId": "u1",
                        "permissions": ["email"],
                        "declinedPermissions": [],
                        "expires": "2030-01-01T00:00:00.000+00:00",
                        "lastRefresh": "2024-01-01T00:00:00.000+00:00",
                        "isExpired": false
                    },
                    "recentlyGrantedPermissions": ["email"],
                    "recentlyDeniedPermissions": []
                }))
            )]
        );
        assert_eq!(f.correlator.state(), SlotState::Idle);
    }

    #[test]
    fn test_cancel_resolves_with_null_token() {
        let f = fixture(None);
        f.correlator
            .begin_login(CallId::from("cb-1"), permissions(&["email"]), None)
            .unwrap();
        f.correlator.on_sdk_cancel();

        assert_eq!(
            f.host.settled(),
            vec![(CallId::from("cb-1"), Ok(json!({ "accessToken": null })))]
        );
        assert!(!f.correlator.is_pending());
    }

    #[test]
    fn test_error_rejects_with_description() {
        let f = fixture(None);
        f.correlator.begin_reauthorize(CallId::from("cb-1")).unwrap();
        f.correlator
            .on_sdk_error(SdkError::new("FacebookException: login disallowed"));

        assert_eq!(
            f.host.settled(),
            vec![(
                CallId::from("cb-1"),
                Err("FacebookException: login disallowed".to_string())
            )]
        );
        assert!(!f.correlator.is_pending());
    }

    #[test]
    fn test_second_terminal_event_is_ignored() {
        let f = fixture(None);
        f.correlator
            .begin_login(CallId::from("cb-1"), permissions(&["email"]), None)
            .unwrap();
        f.correlator
            .on_sdk_success(LoginResult::new(token(), ["email"], Vec::<String>::new()));
        f.correlator.on_sdk_cancel();
        f.correlator.on_sdk_error(SdkError::new("late"));

        let settled = f.host.settled();
        assert_eq!(settled.len(), 1);
        assert!(settled[0].1.as_ref().unwrap()["accessToken"].is_object());
    }

    #[test]
    fn test_stray_callbacks_without_pending_are_swallowed() {
        let f = fixture(None);
        f.correlator
            .on_sdk_success(LoginResult::new(token(), ["email"], Vec::<String>::new()));
        f.correlator.on_sdk_cancel();
        f.correlator.on_sdk_error(SdkError::new("stray"));
        assert!(f.host.settled().is_empty());
    }

    #[test]
    fn test_registered_callback_reaches_correlator() {
        let f = fixture(None);
        f.correlator.begin_reauthorize(CallId::from("cb-1")).unwrap();
        f.sdk.callback().on_cancel();
        assert_eq!(f.host.settled().len(), 1);
        assert_eq!(*f.sdk.reauthorizations.lock().unwrap(), 1);
    }

    #[test]
    fn test_refused_start_frees_slot() {
        let f = fixture(None);
        f.sdk.set_on_start(OnStart::Refuse);
        let result = f
            .correlator
            .begin_login(CallId::from("cb-1"), permissions(&["email"]), None);
        assert_eq!(
            result,
            Err(BridgeError::Provider("activity unavailable".to_string()))
        );
        assert!(!f.correlator.is_pending());

        f.sdk.set_on_start(OnStart::Wait);
        assert!(f.correlator.begin_reauthorize(CallId::from("cb-2")).is_ok());
    }

    #[test]
    fn test_inline_callback_during_begin() {
        let f = fixture(None);
        f.sdk.set_on_start(OnStart::SucceedInline);
        f.correlator
            .begin_login(CallId::from("cb-1"), permissions(&["email"]), None)
            .unwrap();

        let settled = f.host.settled();
        assert_eq!(settled.len(), 1);
        assert_eq!(settled[0].0, CallId::from("cb-1"));
        assert!(!f.correlator.is_pending());
    }

    #[test]
    fn test_inline_outcome_then_refused_start_settles_once() {
        let f = fixture(None);
        f.sdk.set_on_start(OnStart::FailInlineThenRefuse);
        let result = f
            .correlator
            .begin_login(CallId::from("cb-1"), permissions(&["email"]), None);

        assert_eq!(result, Ok(()));
        assert_eq!(
            f.host.settled(),
            vec![(CallId::from("cb-1"), Err("inline failure".to_string()))]
        );
        assert!(!f.correlator.is_pending());

        f.sdk.set_on_start(OnStart::Wait);
        assert!(f.correlator.begin_reauthorize(CallId::from("cb-2")).is_ok());
    }

    #[test]
    fn test_callback_from_another_thread() {
        let f = fixture(None);
        f.correlator
            .begin_login(CallId::from("cb-1"), permissions(&["email"]), None)
            .unwrap();

        let callback = f.sdk.callback();
        thread::spawn(move || callback.on_error(SdkError::new("from sdk thread")))
            .join()
            .unwrap();

        assert_eq!(
            f.host.settled(),
            vec![(CallId::from("cb-1"), Err("from sdk thread".to_string()))]
        );
    }

    #[test]
    fn test_concurrent_begins_admit_exactly_one() {
        let f = fixture(None);
        let handles: Vec<_> = (0..16)
            .map(|i| {
                let correlator = Arc::clone(&f.correlator);
                thread::spawn(move || {
                    correlator.begin_login(CallId::new(format!("cb-{i}")), BTreeSet::new(), None)
                })
            })
            .collect();

        let accepted = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(Result::is_ok)
            .count();
        assert_eq!(accepted, 1);
        assert_eq!(f.sdk.logins.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_pending_is_kept_indefinitely_without_bound() {
        let f = fixture(None);
        f.correlator.begin_reauthorize(CallId::from("cb-1")).unwrap();
        f.clock.advance(86_400 * 30);
        assert_eq!(
            f.correlator.begin_reauthorize(CallId::from("cb-2")),
            Err(BridgeError::Overlap)
        );
    }

    #[test]
    fn test_stale_pending_is_evicted_when_bounded() {
        let f = fixture(Some(Duration::from_secs(300)));
        f.correlator
            .begin_login(CallId::from("cb-1"), permissions(&["email"]), None)
            .unwrap();

        f.clock.advance(299);
        assert_eq!(
            f.correlator.begin_reauthorize(CallId::from("cb-2")),
            Err(BridgeError::Overlap)
        );

        f.clock.advance(1);
        f.correlator.begin_reauthorize(CallId::from("cb-3")).unwrap();

        assert_eq!(
            f.host.settled(),
            vec![(
                CallId::from("cb-1"),
                Err("login call cb-1 abandoned after 300s without a provider callback".to_string())
            )]
        );
        assert_eq!(
            f.correlator.state(),
            SlotState::Pending {
                id: CallId::from("cb-3"),
                kind: PendingKind::Reauthorize
            }
        );
    }

    #[test]
    fn test_evicted_flow_outcome_does_not_reach_successor() {
        let f = fixture(Some(Duration::from_secs(300)));
        f.correlator
            .begin_login(CallId::from("cb-1"), permissions(&["email"]), None)
            .unwrap();
        f.clock.advance(300);
        f.correlator.begin_reauthorize(CallId::from("cb-2")).unwrap();

        // Late outcome of the abandoned login.
        f.correlator
            .on_sdk_success(LoginResult::new(token(), ["email"], Vec::<String>::new()));
        assert_eq!(f.host.settled().len(), 1);
        assert_eq!(
            f.correlator.state(),
            SlotState::Pending {
                id: CallId::from("cb-2"),
                kind: PendingKind::Reauthorize
            }
        );

        f.correlator.on_sdk_cancel();
        assert_eq!(
            f.host.settled()[1],
            (CallId::from("cb-2"), Ok(json!({ "accessToken": null })))
        );
        assert_eq!(f.correlator.state(), SlotState::Idle);
    }

    #[test]
    fn test_out_of_range_stale_bound_disables_eviction() {
        let f = fixture(Some(Duration::from_secs(u64::MAX)));
        f.correlator.begin_reauthorize(CallId::from("cb-1")).unwrap();
        f.clock.advance(86_400 * 365);
        assert_eq!(
            f.correlator.begin_reauthorize(CallId::from("cb-2")),
            Err(BridgeError::Overlap)
        );
        assert_eq!(stale_bound(Duration::from_secs(u64::MAX)), None);
        assert_eq!(
            stale_bound(Duration::from_secs(300)),
            Some(chrono::Duration::seconds(300))
        );
    }
}
