//! Normalized outcome and the response shapes handed to the host.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::{BridgeError, BridgeResult};

/// Wire shape of a credential.
///
/// Timestamps are already rendered as ISO-8601 strings with millisecond
/// precision and a numeric UTC offset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessTokenPayload {
    /// Application the credential was issued to.
    pub application_id: String,
    /// Opaque credential string.
    pub token: String,
    /// User the credential was issued for.
    pub user_id: String,
    /// Granted permissions.
    pub permissions: Vec<String>,
    /// Declined permissions.
    pub declined_permissions: Vec<String>,
    /// Expiry timestamp.
    pub expires: String,
    /// Issue/refresh timestamp.
    pub last_refresh: String,
    /// SDK expiry verdict.
    pub is_expired: bool,
}

/// Terminal result of one authentication exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    /// The provider issued a credential.
    Success {
        /// Normalized credential.
        token: AccessTokenPayload,
        /// Permissions approved during this attempt.
        granted: BTreeSet<String>,
        /// Permissions refused during this attempt.
        denied: BTreeSet<String>,
    },
    /// The user backed out of the flow.
    Cancelled,
    /// The provider reported a failure.
    Failed {
        /// Provider description, verbatim.
        message: String,
    },
}

impl AuthOutcome {
    /// Returns true for the `Success` variant.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Converts the outcome into what the caller receives.
    ///
    /// Cancellation resolves with an absent token; only `Failed` rejects.
    ///
    /// # Errors
    /// Returns [`BridgeError::Provider`] for the `Failed` variant.
    pub fn into_response(self) -> BridgeResult<LoginResponse> {
        match self {
            Self::Success {
                token,
                granted,
                denied,
            } => Ok(LoginResponse {
                access_token: Some(token),
                recently_granted_permissions: Some(granted.into_iter().collect()),
                recently_denied_permissions: Some(denied.into_iter().collect()),
            }),
            Self::Cancelled => Ok(LoginResponse::cancelled()),
            Self::Failed { message } => Err(BridgeError::Provider(message)),
        }
    }
}

/// Response to `login` and `reauthorize`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    /// Issued credential, `null` when the user cancelled.
    pub access_token: Option<AccessTokenPayload>,
    /// Permissions approved during this attempt.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recently_granted_permissions: Option<Vec<String>>,
    /// Permissions refused during this attempt.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recently_denied_permissions: Option<Vec<String>>,
}

impl LoginResponse {
    /// The payload a cancelled flow resolves with.
    #[must_use]
    pub const fn cancelled() -> Self {
        Self {
            access_token: None,
            recently_granted_permissions: None,
            recently_denied_permissions: None,
        }
    }
}

/// Response to `getCurrentAccessToken`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentTokenResponse {
    /// Cached credential, omitted when nothing is cached.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<AccessTokenPayload>,
}
