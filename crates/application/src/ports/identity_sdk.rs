//! Identity-provider SDK port
//!
//! The SDK runs the login UI out of process and reports the outcome later,
//! exactly once, through a callback registered up front.

use std::collections::BTreeSet;
use std::sync::Arc;

use idbridge_domain::{AccessToken, LoginResult};
use serde_json::Value;

/// Failure reported by the SDK.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{description}")]
pub struct SdkError {
    /// Provider description, passed to callers verbatim.
    pub description: String,
}

impl SdkError {
    /// Creates an SDK error with the given description.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

/// Parameters of one login flow.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LoginConfiguration {
    /// Permissions requested from the user.
    pub permissions: BTreeSet<String>,
    /// Hashed nonce, if the caller supplied one.
    pub nonce: Option<String>,
}

impl LoginConfiguration {
    /// Login configuration without a nonce.
    #[must_use]
    pub const fn new(permissions: BTreeSet<String>) -> Self {
        Self {
            permissions,
            nonce: None,
        }
    }

    /// Login configuration carrying an already-hashed nonce.
    #[must_use]
    pub const fn with_nonce(permissions: BTreeSet<String>, hashed_nonce: String) -> Self {
        Self {
            permissions,
            nonce: Some(hashed_nonce),
        }
    }
}

/// Result of an external activity, forwarded untouched to the SDK.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityResult {
    /// Request code the activity was started with.
    pub request_code: i32,
    /// Result code reported by the activity.
    pub result_code: i32,
    /// Opaque payload.
    pub data: Option<Value>,
}

/// Terminal events of a login flow.
///
/// The SDK invokes at most one of these per flow, possibly from its own
/// thread.
pub trait LoginCallback: Send + Sync {
    /// The flow produced a credential.
    fn on_success(&self, result: LoginResult);

    /// The user backed out.
    fn on_cancel(&self);

    /// The flow failed.
    fn on_error(&self, error: SdkError);
}

/// Operations the bridge calls on the identity-provider SDK.
pub trait IdentitySdk: Send + Sync {
    /// Registers the callback that receives login outcomes.
    fn register_callback(&self, callback: Arc<dyn LoginCallback>);

    /// Starts the login UI.
    ///
    /// # Errors
    /// Returns an error if the flow could not be started at all.
    fn log_in(&self, configuration: LoginConfiguration) -> Result<(), SdkError>;

    /// Starts data-access reauthorization.
    ///
    /// # Errors
    /// Returns an error if the flow could not be started at all.
    fn reauthorize_data_access(&self) -> Result<(), SdkError>;

    /// Drops the cached credential.
    fn log_out(&self);

    /// Returns the cached credential, if any.
    fn current_access_token(&self) -> Option<AccessToken>;

    /// Hands an activity result to the SDK's own handler.
    ///
    /// Returns true if the SDK consumed it.
    fn handle_activity_result(&self, result: &ActivityResult) -> bool;
}
