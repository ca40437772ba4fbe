//! In-process identity-provider SDK.
//!
//! Stands in for the native SDK on hosts without one: flows are started by
//! the bridge and finished by whoever drives the simulated login UI.

mod simulated;

pub use simulated::{RESULT_CANCELED, RESULT_OK, RecordedEvent, SimulatedIdentitySdk};
