//! Current access token use case

use std::sync::Arc;

use idbridge_domain::CurrentTokenResponse;
use tracing::debug;

use crate::auth::normalize_token;
use crate::ports::IdentitySdk;

/// Reads the SDK's cached credential snapshot.
pub struct GetCurrentAccessToken {
    sdk: Arc<dyn IdentitySdk>,
}

impl GetCurrentAccessToken {
    /// Creates a new `GetCurrentAccessToken` use case.
    #[must_use]
    pub fn new(sdk: Arc<dyn IdentitySdk>) -> Self {
        Self { sdk }
    }

    /// Executes the use case. An absent token is a normal answer, not an error.
    #[must_use]
    pub fn execute(&self) -> CurrentTokenResponse {
        let access_token = self.sdk.current_access_token();
        match &access_token {
            Some(_) => debug!("cached access token found"),
            None => debug!("no cached access token"),
        }
        CurrentTokenResponse {
            access_token: access_token.as_ref().map(normalize_token),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::test_support::{MockSdk, token};

    #[test]
    fn test_absent_token() {
        let use_case = GetCurrentAccessToken::new(Arc::new(MockSdk::default()));
        assert_eq!(use_case.execute(), CurrentTokenResponse::default());
    }

    #[test]
    fn test_present_token_is_normalized() {
        let use_case = GetCurrentAccessToken::new(Arc::new(MockSdk::with_token(token(true))));
        let response = use_case.execute();
        let payload = response.access_token.as_ref().map(|t| (t.user_id.as_str(), t.is_expired));
        assert_eq!(payload, Some(("42", true)));
        assert_eq!(
            response.access_token.map(|t| t.expires),
            Some("2030-01-01T00:00:00.000+00:00".to_string())
        );
    }
}
