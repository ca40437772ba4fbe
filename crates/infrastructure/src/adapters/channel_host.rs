//! Host bridge backed by tokio oneshot channels.
//!
//! Each registered call gets a [`CallHandle`] the host can await; the bridge
//! core settles it through the [`HostBridge`] port from whatever thread the
//! outcome arrives on.

use std::collections::HashMap;

use idbridge_application::ports::HostBridge;
use idbridge_domain::{BridgeCall, CallId, generate_call_id};
use parking_lot::Mutex;
use serde_json::Value;
use tokio::sync::oneshot;
use tracing::{debug, warn};

/// Outcome of a host call: the resolved payload or the rejection message.
pub type Settlement = Result<Value, String>;

/// Errors observed while waiting for a call to settle.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HostError {
    /// The bridge dropped the call without resolving or rejecting it.
    #[error("call {0} was dropped without a resolution")]
    Dropped(CallId),
}

/// Awaitable resolution of one host call.
#[derive(Debug)]
pub struct CallHandle {
    id: CallId,
    receiver: oneshot::Receiver<Settlement>,
}

impl CallHandle {
    /// Identifier of the call this handle waits on.
    #[must_use]
    pub const fn id(&self) -> &CallId {
        &self.id
    }

    /// Waits until the call is resolved or rejected.
    ///
    /// # Errors
    /// Returns [`HostError::Dropped`] if the bridge forgot the call.
    pub async fn settled(self) -> Result<Settlement, HostError> {
        self.receiver.await.map_err(|_| HostError::Dropped(self.id))
    }

    /// Returns the settlement if it has already arrived.
    pub fn try_settled(&mut self) -> Option<Settlement> {
        self.receiver.try_recv().ok()
    }
}

/// [`HostBridge`] adapter delivering settlements over oneshot channels.
#[derive(Debug, Default)]
pub struct ChannelHostBridge {
    waiting: Mutex<HashMap<CallId, oneshot::Sender<Settlement>>>,
}

impl ChannelHostBridge {
    /// Creates an empty bridge.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `id` and returns the handle its settlement is delivered to.
    pub fn register(&self, id: CallId) -> CallHandle {
        let (sender, receiver) = oneshot::channel();
        if self.waiting.lock().insert(id.clone(), sender).is_some() {
            warn!(call = %id, "call id registered twice; previous waiter dropped");
        }
        CallHandle { id, receiver }
    }

    /// Mints a fresh call carrying `args` and registers it.
    pub fn call(&self, args: Value) -> (BridgeCall, CallHandle) {
        let id = generate_call_id();
        let handle = self.register(id.clone());
        (BridgeCall::new(id, args), handle)
    }

    /// Number of calls still waiting to be settled.
    #[must_use]
    pub fn waiting_calls(&self) -> usize {
        self.waiting.lock().len()
    }

    fn deliver(&self, id: &CallId, settlement: Settlement) {
        let Some(sender) = self.waiting.lock().remove(id) else {
            warn!(call = %id, "settlement for unknown call ignored");
            return;
        };
        if sender.send(settlement).is_err() {
            debug!(call = %id, "caller stopped waiting before settlement");
        }
    }
}

impl HostBridge for ChannelHostBridge {
    fn resolve(&self, id: &CallId, value: Value) {
        debug!(call = %id, "resolve");
        self.deliver(id, Ok(value));
    }

    fn reject(&self, id: &CallId, message: &str) {
        debug!(call = %id, message, "reject");
        self.deliver(id, Err(message.to_string()));
    }
}
