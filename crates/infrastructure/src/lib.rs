//! IdBridge Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports
//! defined in the application layer.

pub mod adapters;
pub mod graph;
pub mod logging;
pub mod sdk;
pub mod settings;

pub use adapters::{CallHandle, ChannelHostBridge, HostError, Settlement, SystemClock};
pub use graph::{GraphClientError, GraphProfileClient};
pub use logging::init_tracing;
pub use sdk::SimulatedIdentitySdk;
pub use settings::{SettingsError, SettingsLoader};
