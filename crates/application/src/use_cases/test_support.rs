//! Shared test doubles for the use case tests.

#![allow(clippy::expect_used, clippy::unwrap_used, missing_docs)]

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use idbridge_domain::{AccessToken, CallId};
use serde_json::Value;

use crate::auth::Correlator;
use crate::ports::{
    ActivityResult, AppEvents, Clock, HostBridge, IdentitySdk, LoginCallback, LoginConfiguration,
    ProfileFetcher, SdkError,
};

pub type Settled = Vec<(CallId, Result<Value, String>)>;

#[derive(Default)]
pub struct MockHost {
    settled: Mutex<Settled>,
}

impl MockHost {
    pub fn settled(&self) -> Settled {
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

#[derive(Default)]
pub struct MockSdk {
    pub callback: Mutex<Option<Arc<dyn LoginCallback>>>,
    pub logins: Mutex<Vec<LoginConfiguration>>,
    pub reauthorizations: Mutex<usize>,
    pub logouts: Mutex<usize>,
    pub token: Mutex<Option<AccessToken>>,
    pub activity_results: Mutex<Vec<ActivityResult>>,
}

impl MockSdk {
    pub fn with_token(token: AccessToken) -> Self {
        let sdk = Self::default();
        *sdk.token.lock().expect("Lock poisoned") = Some(token);
        sdk
    }

    pub fn callback(&self) -> Arc<dyn LoginCallback> {
        self.callback
            .lock()
            .expect("Lock poisoned")
            .clone()
            .expect("callback registered")
    }
}

impl IdentitySdk for MockSdk {
    fn register_callback(&self, callback: Arc<dyn LoginCallback>) {
        *self.callback.lock().expect("Lock poisoned") = Some(callback);
    }

    fn log_in(&self, configuration: LoginConfiguration) -> Result<(), SdkError> {
        self.logins.lock().expect("Lock poisoned").push(configuration);
        Ok(())
    }

    fn reauthorize_data_access(&self) -> Result<(), SdkError> {
        *self.reauthorizations.lock().expect("Lock poisoned") += 1;
        Ok(())
    }

    fn log_out(&self) {
        *self.logouts.lock().expect("Lock poisoned") += 1;
        *self.token.lock().expect("Lock poisoned") = None;
    }

    fn current_access_token(&self) -> Option<AccessToken> {
        self.token.lock().expect("Lock poisoned").clone()
    }

    fn handle_activity_result(&self, result: &ActivityResult) -> bool {
        self.activity_results
            .lock()
            .expect("Lock poisoned")
            .push(result.clone());
        result.request_code == 0xface
    }
}

pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

#[derive(Default)]
pub struct MockEvents {
    pub events: Mutex<Vec<String>>,
    pub auto_log: Mutex<Option<bool>>,
    pub advertiser_id: Mutex<Option<bool>>,
}

impl AppEvents for MockEvents {
    fn log_event(&self, name: &str) {
        self.events
            .lock()
            .expect("Lock poisoned")
            .push(name.to_string());
    }

    fn set_auto_log_app_events_enabled(&self, enabled: bool) {
        *self.auto_log.lock().expect("Lock poisoned") = Some(enabled);
    }

    fn set_advertiser_id_collection_enabled(&self, enabled: bool) {
        *self.advertiser_id.lock().expect("Lock poisoned") = Some(enabled);
    }
}

/// Profile fetcher answering every request with a canned result.
pub struct StubProfiles {
    pub response: Result<Value, SdkError>,
    pub requests: Mutex<Vec<Vec<String>>>,
}

impl StubProfiles {
    pub fn answering(response: Result<Value, SdkError>) -> Self {
        Self {
            response,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().expect("Lock poisoned").len()
    }
}

#[async_trait]
impl ProfileFetcher for StubProfiles {
    async fn fetch_profile(
        &self,
        _token: &AccessToken,
        fields: &[String],
    ) -> Result<Value, SdkError> {
        self.requests
            .lock()
            .expect("Lock poisoned")
            .push(fields.to_vec());
        self.response.clone()
    }
}

pub fn token(expired: bool) -> AccessToken {
    AccessToken {
        application_id: "app-1".to_string(),
        token: "EAAB".to_string(),
        user_id: "42".to_string(),
        permissions: BTreeSet::from(["email".to_string()]),
        declined_permissions: BTreeSet::new(),
        expires: Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap(),
        last_refresh: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        expired,
    }
}

pub fn correlator(sdk: &Arc<MockSdk>, host: &Arc<MockHost>) -> Arc<Correlator> {
    Correlator::install(
        sdk.clone(),
        host.clone(),
        Arc::new(FixedClock(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap())),
    )
}
