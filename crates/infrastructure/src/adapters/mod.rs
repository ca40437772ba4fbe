//! Port adapters for the host side of the bridge.

mod channel_host;
mod system_clock;

pub use channel_host::{CallHandle, ChannelHostBridge, HostError, Settlement};
pub use system_clock::SystemClock;
