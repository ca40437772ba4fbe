//! Port definitions (interfaces)
//!
//! Ports define the boundaries between the bridge core and its external
//! collaborators: the identity-provider SDK, the host bridge that carries
//! calls in and resolutions out, the profile endpoint and app-event logging.
//! Each port is a trait implemented by adapters in the infrastructure layer.

mod app_events;
mod clock;
mod host_bridge;
mod identity_sdk;
mod profile_fetcher;

pub use app_events::AppEvents;
pub use clock::Clock;
pub use host_bridge::{HostBridge, settle};
pub use identity_sdk::{ActivityResult, IdentitySdk, LoginCallback, LoginConfiguration, SdkError};
pub use profile_fetcher::ProfileFetcher;
