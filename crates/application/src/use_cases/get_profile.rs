//! Profile fetch use case

use std::sync::Arc;

use idbridge_domain::{BridgeCall, BridgeError, BridgeResult};
use serde_json::Value;
use tracing::{debug, warn};

use crate::ports::{IdentitySdk, ProfileFetcher};

/// Fetches the logged-in user's profile.
///
/// Requires a cached, non-expired credential; neither precondition failure
/// contacts the provider. Fetches are independent of the correlator, so any
/// number may be in flight.
pub struct GetProfile<F> {
    sdk: Arc<dyn IdentitySdk>,
    fetcher: F,
}

impl<F: ProfileFetcher> GetProfile<F> {
    /// Creates a new `GetProfile` use case.
    pub fn new(sdk: Arc<dyn IdentitySdk>, fetcher: F) -> Self {
        Self { sdk, fetcher }
    }

    /// Executes the use case.
    ///
    /// # Errors
    /// [`BridgeError::NotLoggedIn`], [`BridgeError::ExpiredToken`],
    /// [`BridgeError::MalformedArgument`] for an unparsable `fields` list, or
    /// [`BridgeError::Provider`] with the provider's message.
    pub async fn execute(&self, call: &BridgeCall) -> BridgeResult<Value> {
        debug!(call = %call.id, "get_profile");

        let Some(token) = self.sdk.current_access_token() else {
            debug!("get_profile: no cached access token");
            return Err(BridgeError::NotLoggedIn);
        };
        if token.is_expired() {
            debug!("get_profile: access token expired");
            return Err(BridgeError::ExpiredToken);
        }

        let fields = call
            .string_array("fields")
            .ok_or_else(|| BridgeError::malformed("Can't handle fields"))?;

        self.fetcher
            .fetch_profile(&token, &fields)
            .await
            .map_err(|err| {
                warn!(call = %call.id, error = %err, "get_profile: provider error");
                BridgeError::Provider(err.description)
            })
    }
}
