//! Host bridge port

use idbridge_domain::{BridgeError, BridgeResult, CallId};
use serde::Serialize;
use serde_json::Value;

/// Delivers resolutions back to host calls.
///
/// The core settles each call id at most once.
pub trait HostBridge: Send + Sync {
    /// Resolves a call with a JSON payload.
    fn resolve(&self, id: &CallId, value: Value);

    /// Rejects a call with a message.
    fn reject(&self, id: &CallId, message: &str);
}

/// Resolves or rejects `id` according to `result`.
pub fn settle<T: Serialize>(host: &dyn HostBridge, id: &CallId, result: BridgeResult<T>) {
    let result = result.and_then(|value| {
        serde_json::to_value(value)
            .map_err(|e| BridgeError::provider(format!("Can't create response: {e}")))
    });
    match result {
        Ok(value) => host.resolve(id, value),
        Err(err) => host.reject(id, &err.to_string()),
    }
}
