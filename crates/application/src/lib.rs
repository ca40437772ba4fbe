//! IdBridge Application - Correlator, use cases and ports
//!
//! This crate defines the application layer with:
//! - Port traits for the identity-provider SDK, host bridge and profile endpoint
//! - The pending-call correlator and result normalization
//! - Use cases forming the public operation surface
//! - The [`AuthBridge`] facade dispatching host calls to them

pub mod auth;
pub mod bridge;
pub mod ports;
pub mod use_cases;

pub use auth::{Correlator, SlotState, hash_nonce, normalize_login, normalize_token};
pub use bridge::{AuthBridge, methods};
pub use ports::{
    ActivityResult, AppEvents, Clock, HostBridge, IdentitySdk, LoginCallback, LoginConfiguration,
    ProfileFetcher, SdkError,
};
pub use use_cases::{
    GetCurrentAccessToken, GetProfile, Login, Logout, Reauthorize, RecordAppEvents,
};
