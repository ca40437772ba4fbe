//! Domain error types

use thiserror::Error;

use crate::{CallId, PendingKind};

/// Reasons a host call is rejected.
///
/// The `Display` text is the message handed back to the caller.
/// User cancellation is not listed here: it resolves the call.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BridgeError {
    /// A login or reauthorization is already outstanding.
    #[error("Overlapped calls not supported")]
    Overlap,

    /// No cached credential exists.
    #[error("You're not logged in. Call login() first to obtain an access token.")]
    NotLoggedIn,

    /// The cached credential is expired.
    #[error("AccessToken is expired.")]
    ExpiredToken,

    /// The provider reported a failure; the message is passed through verbatim.
    #[error("{0}")]
    Provider(String),

    /// The caller supplied an argument that could not be parsed.
    #[error("{0}")]
    MalformedArgument(String),

    /// A pending request was evicted after waiting too long for the provider.
    #[error("{kind} call {id} abandoned after {waited_secs}s without a provider callback")]
    StalePending {
        /// Call that was evicted.
        id: CallId,
        /// Operation it belonged to.
        kind: PendingKind,
        /// Seconds it had been waiting.
        waited_secs: i64,
    },
}

impl BridgeError {
    /// Creates a provider error from any displayable failure.
    pub fn provider(message: impl Into<String>) -> Self {
        Self::Provider(message.into())
    }

    /// Creates a malformed-argument error.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedArgument(message.into())
    }
}

/// Result type alias for bridge operations.
pub type BridgeResult<T> = Result<T, BridgeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_message_is_verbatim() {
        let err = BridgeError::provider("Graph error: (#100) Invalid parameter");
        assert_eq!(err.to_string(), "Graph error: (#100) Invalid parameter");
    }

    #[test]
    fn test_precondition_messages() {
        assert!(BridgeError::NotLoggedIn.to_string().contains("not logged in"));
        assert!(BridgeError::ExpiredToken.to_string().contains("expired"));
        assert_eq!(BridgeError::Overlap.to_string(), "Overlapped calls not supported");
    }

    #[test]
    fn test_stale_pending_message() {
        let err = BridgeError::StalePending {
            id: CallId::from("cb-9"),
            kind: PendingKind::Reauthorize,
            waited_secs: 600,
        };
        assert_eq!(
            err.to_string(),
            "reauthorize call cb-9 abandoned after 600s without a provider callback"
        );
    }
}
