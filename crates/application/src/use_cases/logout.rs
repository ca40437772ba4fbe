//! Logout use case

use std::sync::Arc;

use tracing::debug;

use crate::ports::IdentitySdk;

/// Drops the SDK's cached credential. Never fails and never touches the
/// correlator.
pub struct Logout {
    sdk: Arc<dyn IdentitySdk>,
}

impl Logout {
    /// Creates a new `Logout` use case.
    #[must_use]
    pub fn new(sdk: Arc<dyn IdentitySdk>) -> Self {
        Self { sdk }
    }

    /// Executes the use case.
    pub fn execute(&self) {
        debug!("logout");
        self.sdk.log_out();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::use_cases::test_support::{MockSdk, token};

    #[test]
    fn test_logout_clears_cached_token() {
        let sdk = Arc::new(MockSdk::with_token(token(false)));
        Logout::new(sdk.clone()).execute();
        assert_eq!(*sdk.logouts.lock().unwrap(), 1);
        assert!(sdk.current_access_token().is_none());
    }
}
