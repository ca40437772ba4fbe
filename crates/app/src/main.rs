//! IdBridge - Host harness
//!
//! Wires the bridge to the in-process SDK and a channel-backed host, then
//! walks one login session end to end and prints every settlement.
//!
//! Usage: `idbridge [settings.yaml]`

use std::sync::Arc;

use chrono::{Duration, Utc};
use idbridge_application::{AuthBridge, methods};
use idbridge_domain::{AccessToken, LoginResult};
use idbridge_infrastructure::{
    CallHandle, ChannelHostBridge, GraphProfileClient, SettingsLoader, SimulatedIdentitySdk,
    SystemClock, init_tracing,
};
use serde_json::json;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let loader = std::env::args()
        .nth(1)
        .map_or_else(SettingsLoader::new, SettingsLoader::with_file);
    let settings = loader.load().await?;
    init_tracing(&settings.log_filter)?;

    info!("Starting IdBridge v{}", env!("CARGO_PKG_VERSION"));

    let sdk = Arc::new(SimulatedIdentitySdk::from_settings(&settings));
    let host = Arc::new(ChannelHostBridge::new());
    let bridge = AuthBridge::new(
        sdk.clone(),
        host.clone(),
        Arc::new(SystemClock::new()),
        GraphProfileClient::new(&settings)?,
        sdk.clone(),
        &settings,
    );

    let (call, handle) = host.call(json!({}));
    bridge.dispatch(methods::INITIALIZE, &call).await;
    report(methods::INITIALIZE, handle).await?;

    let (call, handle) = host.call(json!({
        "permissions": ["public_profile", "email"],
        "nonce": "harness-nonce",
    }));
    bridge.dispatch(methods::LOGIN, &call).await;
    info!(state = ?bridge.correlator().state(), "login accepted");

    // The provider UI answers from its own thread.
    let ui = Arc::clone(&sdk);
    tokio::task::spawn_blocking(move || ui.complete_login(harness_login())).await?;
    report(methods::LOGIN, handle).await?;

    let (call, handle) = host.call(json!({}));
    bridge.dispatch(methods::GET_CURRENT_ACCESS_TOKEN, &call).await;
    report(methods::GET_CURRENT_ACCESS_TOKEN, handle).await?;

    let (call, handle) = host.call(json!({ "eventName": "harness_session" }));
    bridge.dispatch(methods::LOG_EVENT, &call).await;
    report(methods::LOG_EVENT, handle).await?;

    let (call, handle) = host.call(json!({}));
    bridge.dispatch(methods::LOGOUT, &call).await;
    report(methods::LOGOUT, handle).await?;

    let (call, handle) = host.call(json!({}));
    bridge.dispatch(methods::GET_CURRENT_ACCESS_TOKEN, &call).await;
    report(methods::GET_CURRENT_ACCESS_TOKEN, handle).await?;

    Ok(())
}

async fn report(method: &str, handle: CallHandle) -> Result<(), Box<dyn std::error::Error>> {
    match handle.settled().await? {
        Ok(value) => println!("{method} resolved: {}", serde_json::to_string_pretty(&value)?),
        Err(message) => println!("{method} rejected: {message}"),
    }
    Ok(())
}

fn harness_login() -> LoginResult {
    let now = Utc::now();
    let token = AccessToken {
        application_id: "harness-app".to_string(),
        token: "harness-token".to_string(),
        user_id: "harness-user".to_string(),
        permissions: ["public_profile", "email"].map(String::from).into(),
        declined_permissions: std::collections::BTreeSet::new(),
        expires: now + Duration::days(60),
        last_refresh: now,
        expired: false,
    };
    LoginResult::new(token, ["public_profile", "email"], Vec::<String>::new())
}
