//! Login use case

use std::sync::Arc;

use idbridge_domain::{BridgeCall, BridgeError, BridgeResult};
use tracing::{debug, error};

use crate::auth::Correlator;

/// Starts an interactive login for a host call.
///
/// The call is only accepted here; it is settled later by the correlator once
/// the SDK reports success, cancellation or failure.
pub struct Login {
    correlator: Arc<Correlator>,
}

impl Login {
    /// Creates a new `Login` use case.
    #[must_use]
    pub const fn new(correlator: Arc<Correlator>) -> Self {
        Self { correlator }
    }

    /// Executes the use case.
    ///
    /// Reads `permissions` (array of strings, required) and `nonce`
    /// (string, optional; empty means none).
    ///
    /// # Errors
    /// [`BridgeError::MalformedArgument`] for an unparsable permission list,
    /// otherwise whatever [`Correlator::begin_login`] reports.
    pub fn execute(&self, call: &BridgeCall) -> BridgeResult<()> {
        debug!(call = %call.id, "login");

        let Some(permissions) = call.string_array("permissions") else {
            error!(call = %call.id, "login: invalid 'permissions' argument");
            return Err(BridgeError::malformed("Invalid permissions argument"));
        };
        let nonce = call.string_or("nonce", "");

        self.correlator
            .begin_login(call.id.clone(), permissions.into_iter().collect(), Some(nonce))
    }
}
