//! Profile fetcher backed by the provider's Graph API.
//!
//! Issues `GET {base}/{version}/me?fields=..&access_token=..` and hands the
//! JSON object back untouched.

use async_trait::async_trait;
use idbridge_application::ports::{ProfileFetcher, SdkError};
use idbridge_domain::{AccessToken, BridgeSettings};
use reqwest::Client;
use serde_json::Value;
use tracing::debug;
use url::Url;

/// Errors raised while building the client.
#[derive(Debug, thiserror::Error)]
pub enum GraphClientError {
    /// The configured base URL is not a usable absolute URL.
    #[error("invalid Graph API base URL '{url}': {reason}")]
    InvalidBaseUrl {
        /// Configured value.
        url: String,
        /// Parser diagnostic.
        reason: String,
    },

    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Client(String),
}

/// [`ProfileFetcher`] talking to the Graph API over HTTPS.
#[derive(Debug, Clone)]
pub struct GraphProfileClient {
    client: Client,
    base: Url,
    version: String,
}

impl GraphProfileClient {
    /// Creates a client for the Graph API described by `settings`.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL does not parse or the HTTP client
    /// cannot be created.
    pub fn new(settings: &BridgeSettings) -> Result<Self, GraphClientError> {
        let client = Client::builder()
            .user_agent(concat!("idbridge/", env!("CARGO_PKG_VERSION")))
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(|e| GraphClientError::Client(e.to_string()))?;
        Self::with_client(client, settings)
    }

    /// Creates a client around an existing reqwest client.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL does not parse.
    pub fn with_client(client: Client, settings: &BridgeSettings) -> Result<Self, GraphClientError> {
        let base = base_url(&settings.graph_api_base_url)?;
        Ok(Self {
            client,
            base,
            version: settings.graph_api_version.trim_matches('/').to_string(),
        })
    }

    /// Builds the `/me` URL for `token` requesting `fields`.
    ///
    /// # Errors
    ///
    /// Returns an error if the version segment does not form a valid path.
    pub fn me_url(&self, token: &str, fields: &[String]) -> Result<Url, SdkError> {
        let mut url = self
            .base
            .join(&format!("{}/me", self.version))
            .map_err(|e| SdkError::new(format!("Can't build Graph API URL: {e}")))?;
        url.query_pairs_mut()
            .append_pair("fields", &fields.join(","))
            .append_pair("access_token", token);
        Ok(url)
    }
}

fn base_url(raw: &str) -> Result<Url, GraphClientError> {
    // Url::join replaces the last segment unless the base ends with '/'.
    let normalized = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{raw}/")
    };
    let url = Url::parse(&normalized).map_err(|e| GraphClientError::InvalidBaseUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;
    if url.cannot_be_a_base() {
        return Err(GraphClientError::InvalidBaseUrl {
            url: raw.to_string(),
            reason: "URL cannot be a base".to_string(),
        });
    }
    Ok(url)
}

/// Maps a Graph API response to the profile object or the provider's error.
///
/// A body of the form `{"error": {"message": ..}}` is an error regardless of
/// status; otherwise any non-success status is.
///
/// # Errors
///
/// Returns the provider's message, or a description of the failed status or
/// unparseable body.
pub fn interpret_graph_response(status: u16, body: &[u8]) -> Result<Value, SdkError> {
    let success = (200..300).contains(&status);
    let value: Value = match serde_json::from_slice(body) {
        Ok(value) => value,
        Err(_) if !success => {
            return Err(SdkError::new(format!(
                "Graph API request failed with status {status}"
            )));
        }
        Err(e) => return Err(SdkError::new(format!("Can't parse profile response: {e}"))),
    };

    if let Some(message) = value.pointer("/error/message").and_then(Value::as_str) {
        return Err(SdkError::new(message));
    }
    if !success {
        return Err(SdkError::new(format!(
            "Graph API request failed with status {status}"
        )));
    }
    Ok(value)
}

#[async_trait]
impl ProfileFetcher for GraphProfileClient {
    async fn fetch_profile(
        &self,
        token: &AccessToken,
        fields: &[String],
    ) -> Result<Value, SdkError> {
        let url = self.me_url(&token.token, fields)?;
        debug!(fields = fields.len(), "fetching profile");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| SdkError::new(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| SdkError::new(e.to_string()))?;

        interpret_graph_response(status, &body)
    }
}
