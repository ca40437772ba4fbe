//! Conversion of SDK-native results into the response contract.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use idbridge_domain::{AccessToken, AccessTokenPayload, AuthOutcome, LoginResult};

/// Timestamp layout used on the wire: millisecond precision, numeric offset.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f%:z";

/// Renders an instant as e.g. `2024-01-02T03:04:05.678+00:00`.
#[must_use]
pub fn format_timestamp(instant: &DateTime<Utc>) -> String {
    instant.format(TIMESTAMP_FORMAT).to_string()
}

/// Copies a permission collection element for element.
#[must_use]
pub fn permissions_to_wire(permissions: &BTreeSet<String>) -> Vec<String> {
    permissions.iter().cloned().collect()
}

/// Normalizes a cached or freshly issued credential.
///
/// The expiry flag is taken from the SDK as is.
#[must_use]
pub fn normalize_token(token: &AccessToken) -> AccessTokenPayload {
    AccessTokenPayload {
        application_id: token.application_id.clone(),
        token: token.token.clone(),
        user_id: token.user_id.clone(),
        permissions: permissions_to_wire(&token.permissions),
        declined_permissions: permissions_to_wire(&token.declined_permissions),
        expires: format_timestamp(&token.expires),
        last_refresh: format_timestamp(&token.last_refresh),
        is_expired: token.is_expired(),
    }
}

/// Splits a login result's permission delta into granted and denied sets.
#[must_use]
pub fn normalize_permission_delta(result: &LoginResult) -> (BTreeSet<String>, BTreeSet<String>) {
    (
        result.recently_granted.clone(),
        result.recently_denied.clone(),
    )
}

/// Normalizes a successful login into [`AuthOutcome::Success`].
#[must_use]
pub fn normalize_login(result: &LoginResult) -> AuthOutcome {
    let (granted, denied) = normalize_permission_delta(result);
    AuthOutcome::Success {
        token: normalize_token(&result.access_token),
        granted,
        denied,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn sdk_token() -> AccessToken {
        AccessToken {
            application_id: "1234567890".to_string(),
            token: "EAAGm0PX4ZCpsBA".to_string(),
            user_id: "10158".to_string(),
            permissions: BTreeSet::from(["email".to_string(), "public_profile".to_string()]),
            declined_permissions: BTreeSet::from(["user_friends".to_string()]),
            expires: Utc.timestamp_millis_opt(1_704_164_645_678).unwrap(),
            last_refresh: Utc.timestamp_millis_opt(1_698_894_245_001).unwrap(),
            expired: true,
        }
    }

    fn matches_wire_format(value: &str) -> bool {
        // \d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}\.\d{3}[+-]\d{2}:\d{2}
        let bytes = value.as_bytes();
        if bytes.len() != 29 {
            return false;
        }
        bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            10 => *b == b'T',
            13 | 16 | 26 => *b == b':',
            19 => *b == b'.',
            23 => *b == b'+' || *b == b'-',
            _ => b.is_ascii_digit(),
        })
    }

    #[test]
    fn test_format_timestamp() {
        let instant = Utc.timestamp_millis_opt(1_704_164_645_678).unwrap();
        assert_eq!(format_timestamp(&instant), "2024-01-02T03:04:05.678+00:00");
        assert!(matches_wire_format(&format_timestamp(&instant)));
    }

    #[test]
    fn test_whole_seconds_keep_millis() {
        let instant = Utc.with_ymd_and_hms(2030, 12, 31, 23, 59, 59).unwrap();
        assert_eq!(format_timestamp(&instant), "2030-12-31T23:59:59.000+00:00");
    }

    #[test]
    fn test_normalize_token_copies_fields() {
        let payload = normalize_token(&sdk_token());
        assert_eq!(
            payload,
            AccessTokenPayload {
                application_id: "1234567890".to_string(),
                token: "EAAGm0PX4ZCpsBA".to_string(),
                user_id: "10158".to_string(),
                permissions: vec!["email".to_string(), "public_profile".to_string()],
                declined_permissions: vec!["user_friends".to_string()],
                expires: "2024-01-02T03:04:05.678+00:00".to_string(),
                last_refresh: "2023-11-02T03:04:05.001+00:00".to_string(),
                is_expired: true,
            }
        );
        assert!(matches_wire_format(&payload.last_refresh));
    }

    #[test]
    fn test_normalize_login() {
        let result = LoginResult::new(sdk_token(), ["email"], ["user_friends"]);
        let AuthOutcome::Success {
            token,
            granted,
            denied,
        } = normalize_login(&result)
        else {
            panic!("expected success");
        };
        assert_eq!(token.user_id, "10158");
        assert_eq!(granted, BTreeSet::from(["email".to_string()]));
        assert_eq!(denied, BTreeSet::from(["user_friends".to_string()]));
    }
}
