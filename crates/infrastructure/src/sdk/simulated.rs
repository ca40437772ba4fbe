//! Simulated identity-provider SDK.

use std::sync::Arc;

use idbridge_application::ports::{
    ActivityResult, AppEvents, IdentitySdk, LoginCallback, LoginConfiguration, SdkError,
};
use idbridge_domain::settings::DEFAULT_REQUEST_CODE_OFFSET;
use idbridge_domain::{AccessToken, BridgeSettings, LoginResult};
use parking_lot::Mutex;
use tracing::{debug, info, warn};

/// Activity result code for a completed flow.
pub const RESULT_OK: i32 = -1;
/// Activity result code for a flow the user backed out of.
pub const RESULT_CANCELED: i32 = 0;

/// Pass-through call recorded by the simulated event logger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedEvent {
    /// A named app event.
    Event(String),
    /// Automatic app-event logging was toggled.
    AutoLogAppEvents(bool),
    /// Advertiser-id collection was toggled.
    AdvertiserIdCollection(bool),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Login,
    Reauthorize,
}

#[derive(Debug, Default)]
struct SdkState {
    token: Option<AccessToken>,
    flow: Option<Flow>,
    last_configuration: Option<LoginConfiguration>,
    refuse_next_start: Option<String>,
    events: Vec<RecordedEvent>,
}

/// [`IdentitySdk`] and [`AppEvents`] implementation that keeps everything
/// in memory.
///
/// Login flows started by the bridge stay open until [`complete_login`],
/// [`cancel_login`], [`fail_login`] or a matching activity result finishes
/// them. Completion fires the registered callback on the caller's thread.
///
/// [`complete_login`]: SimulatedIdentitySdk::complete_login
/// [`cancel_login`]: SimulatedIdentitySdk::cancel_login
/// [`fail_login`]: SimulatedIdentitySdk::fail_login
pub struct SimulatedIdentitySdk {
    state: Mutex<SdkState>,
    callback: Mutex<Option<Arc<dyn LoginCallback>>>,
    request_code_offset: u32,
}

impl Default for SimulatedIdentitySdk {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SimulatedIdentitySdk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulatedIdentitySdk")
            .field("state", &*self.state.lock())
            .field("callback_registered", &self.callback.lock().is_some())
            .field("request_code_offset", &self.request_code_offset)
            .finish()
    }
}

impl SimulatedIdentitySdk {
    /// Creates an SDK with no cached credential.
    #[must_use]
    pub fn new() -> Self {
        Self::with_request_code_offset(DEFAULT_REQUEST_CODE_OFFSET)
    }

    /// Creates an SDK that claims activity results tagged with `offset`.
    #[must_use]
    pub fn with_request_code_offset(offset: u32) -> Self {
        Self {
            state: Mutex::new(SdkState::default()),
            callback: Mutex::new(None),
            request_code_offset: offset,
        }
    }

    /// Creates an SDK configured from bridge settings.
    #[must_use]
    pub fn from_settings(settings: &BridgeSettings) -> Self {
        Self::with_request_code_offset(settings.activity_request_code_offset)
    }

    /// Replaces the cached credential.
    pub fn set_current_token(&self, token: Option<AccessToken>) {
        self.state.lock().token = token;
    }

    /// Makes the next `log_in` or `reauthorize_data_access` fail to start.
    pub fn refuse_next_start(&self, description: impl Into<String>) {
        self.state.lock().refuse_next_start = Some(description.into());
    }

    /// Returns true while a flow is waiting for an outcome.
    #[must_use]
    pub fn flow_in_progress(&self) -> bool {
        self.state.lock().flow.is_some()
    }

    /// Configuration of the most recent login flow.
    #[must_use]
    pub fn last_configuration(&self) -> Option<LoginConfiguration> {
        self.state.lock().last_configuration.clone()
    }

    /// Pass-through calls recorded so far.
    #[must_use]
    pub fn recorded_events(&self) -> Vec<RecordedEvent> {
        self.state.lock().events.clone()
    }

    /// Finishes the current flow with a credential.
    ///
    /// The credential becomes the cached token. Returns false if no callback
    /// was registered to receive the outcome.
    pub fn complete_login(&self, result: LoginResult) -> bool {
        {
            let mut state = self.state.lock();
            state.flow = None;
            state.token = Some(result.access_token.clone());
        }
        self.fire(|callback| callback.on_success(result))
    }

    /// Finishes the current flow as cancelled by the user.
    pub fn cancel_login(&self) -> bool {
        self.state.lock().flow = None;
        self.fire(|callback| callback.on_cancel())
    }

    /// Finishes the current flow with a provider error.
    pub fn fail_login(&self, description: impl Into<String>) -> bool {
        self.state.lock().flow = None;
        let error = SdkError::new(description);
        self.fire(|callback| callback.on_error(error))
    }

    fn fire(&self, deliver: impl FnOnce(&dyn LoginCallback)) -> bool {
        let callback = self.callback.lock().clone();
        match callback {
            Some(callback) => {
                deliver(callback.as_ref());
                true
            }
            None => {
                warn!("login outcome produced with no callback registered");
                false
            }
        }
    }

    fn start(&self, flow: Flow, configuration: Option<LoginConfiguration>) -> Result<(), SdkError> {
        let mut state = self.state.lock();
        if let Some(description) = state.refuse_next_start.take() {
            return Err(SdkError::new(description));
        }
        if flow == Flow::Reauthorize && state.token.is_none() {
            return Err(SdkError::new(
                "No access token available for data access reauthorization",
            ));
        }
        if let Some(previous) = state.flow.replace(flow) {
            warn!(?previous, ?flow, "flow started while another was open");
        }
        if configuration.is_some() {
            state.last_configuration = configuration;
        }
        Ok(())
    }

    fn activity_outcome(&self, result: &ActivityResult) {
        match (result.result_code, &result.data) {
            (RESULT_OK, Some(data)) => match serde_json::from_value::<LoginResult>(data.clone()) {
                Ok(login) => {
                    self.complete_login(login);
                }
                Err(e) => {
                    self.fail_login(format!("Unexpected login activity payload: {e}"));
                }
            },
            (RESULT_CANCELED, _) => {
                self.cancel_login();
            }
            (code, _) => {
                self.fail_login(format!("Login activity finished with result code {code}"));
            }
        }
    }
}

impl IdentitySdk for SimulatedIdentitySdk {
    fn register_callback(&self, callback: Arc<dyn LoginCallback>) {
        if self.callback.lock().replace(callback).is_some() {
            debug!("login callback replaced");
        }
    }

    fn log_in(&self, configuration: LoginConfiguration) -> Result<(), SdkError> {
        info!(
            permissions = configuration.permissions.len(),
            nonce = configuration.nonce.is_some(),
            "login flow started"
        );
        self.start(Flow::Login, Some(configuration))
    }

    fn reauthorize_data_access(&self) -> Result<(), SdkError> {
        info!("reauthorization flow started");
        self.start(Flow::Reauthorize, None)
    }

    fn log_out(&self) {
        self.state.lock().token = None;
    }

    fn current_access_token(&self) -> Option<AccessToken> {
        self.state.lock().token.clone()
    }

    fn handle_activity_result(&self, result: &ActivityResult) -> bool {
        if i64::from(result.request_code) != i64::from(self.request_code_offset) {
            return false;
        }
        self.activity_outcome(result);
        true
    }
}

impl AppEvents for SimulatedIdentitySdk {
    fn log_event(&self, name: &str) {
        self.state
            .lock()
            .events
            .push(RecordedEvent::Event(name.to_string()));
    }

    fn set_auto_log_app_events_enabled(&self, enabled: bool) {
        self.state
            .lock()
            .events
            .push(RecordedEvent::AutoLogAppEvents(enabled));
    }

    fn set_advertiser_id_collection_enabled(&self, enabled: bool) {
        self.state
            .lock()
            .events
            .push(RecordedEvent::AdvertiserIdCollection(enabled));
    }
}
