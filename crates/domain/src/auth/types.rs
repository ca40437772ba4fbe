//! Provider-native credential shapes

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Credential as the identity provider's SDK caches and reports it.
///
/// `expired` is the SDK's own judgment; nothing in the bridge recomputes it
/// against wall-clock time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken {
    /// Application the credential was issued to.
    pub application_id: String,
    /// Opaque credential string.
    pub token: String,
    /// User the credential was issued for.
    pub user_id: String,
    /// Permissions granted to the credential.
    #[serde(default)]
    pub permissions: BTreeSet<String>,
    /// Permissions the user declined.
    #[serde(default)]
    pub declined_permissions: BTreeSet<String>,
    /// Expiry instant.
    pub expires: DateTime<Utc>,
    /// Last time the credential was issued or refreshed.
    pub last_refresh: DateTime<Utc>,
    /// Whether the SDK considers the credential expired.
    #[serde(default)]
    pub expired: bool,
}

impl AccessToken {
    /// Returns the SDK's expiry verdict.
    #[must_use]
    pub const fn is_expired(&self) -> bool {
        self.expired
    }

    /// Returns true if `permission` was granted.
    #[must_use]
    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.contains(permission)
    }
}

/// Successful login as delivered by the SDK's success callback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResult {
    /// Credential issued by this login.
    pub access_token: AccessToken,
    /// Permissions the user approved during this attempt.
    #[serde(default)]
    pub recently_granted: BTreeSet<String>,
    /// Permissions the user refused during this attempt.
    #[serde(default)]
    pub recently_denied: BTreeSet<String>,
}

impl LoginResult {
    /// Creates a login result for `access_token` with the given permission delta.
    pub fn new<G, D>(access_token: AccessToken, granted: G, denied: D) -> Self
    where
        G: IntoIterator,
        G::Item: Into<String>,
        D: IntoIterator,
        D::Item: Into<String>,
    {
        Self {
            access_token,
            recently_granted: granted.into_iter().map(Into::into).collect(),
            recently_denied: denied.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn token(expired: bool) -> AccessToken {
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

    #[test]
    fn test_expired_flag_is_trusted() {
        assert!(!token(false).is_expired());
        assert!(token(true).is_expired());
    }

    #[test]
    fn test_login_result_collects_sets() {
        let result = LoginResult::new(token(false), ["email", "email"], Vec::<String>::new());
        assert_eq!(result.recently_granted.len(), 1);
        assert!(result.recently_denied.is_empty());
        assert!(result.access_token.has_permission("email"));
    }
}
