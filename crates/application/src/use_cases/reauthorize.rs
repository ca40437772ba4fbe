//! Reauthorize use case

use std::sync::Arc;

use idbridge_domain::{BridgeCall, BridgeResult};
use tracing::debug;

use crate::auth::Correlator;

/// Starts data-access reauthorization for a host call.
///
/// Shares the correlator slot with [`crate::Login`].
pub struct Reauthorize {
    correlator: Arc<Correlator>,
}

impl Reauthorize {
    /// Creates a new `Reauthorize` use case.
    #[must_use]
    pub const fn new(correlator: Arc<Correlator>) -> Self {
        Self { correlator }
    }

    /// Executes the use case.
    ///
    /// # Errors
    /// Whatever [`Correlator::begin_reauthorize`] reports.
    pub fn execute(&self, call: &BridgeCall) -> BridgeResult<()> {
        debug!(call = %call.id, "reauthorize");
        self.correlator.begin_reauthorize(call.id.clone())
    }
}
