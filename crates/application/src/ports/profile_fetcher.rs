//! Profile fetch port

use async_trait::async_trait;
use idbridge_domain::AccessToken;
use serde_json::Value;

use super::SdkError;

/// Fetches the logged-in user's profile from the identity provider.
///
/// Each call is independent; several fetches may be in flight at once.
#[async_trait]
pub trait ProfileFetcher: Send + Sync {
    /// Requests `fields` of the profile owned by `token`.
    ///
    /// # Returns
    /// The provider's JSON object, unmodified.
    ///
    /// # Errors
    /// Returns the provider's error description on failure.
    async fn fetch_profile(&self, token: &AccessToken, fields: &[String])
    -> Result<Value, SdkError>;
}

#[async_trait]
impl<T: ProfileFetcher + ?Sized> ProfileFetcher for std::sync::Arc<T> {
    async fn fetch_profile(
        &self,
        token: &AccessToken,
        fields: &[String],
    ) -> Result<Value, SdkError> {
        self.as_ref().fetch_profile(token, fields).await
    }
}
