//! IdBridge Domain - Core types
//!
//! This crate defines the domain model for the identity-provider login bridge:
//! host call identifiers, the single pending authentication exchange, the
//! provider-native credential shapes and the normalized response contract.
//! All types here are pure Rust with no I/O dependencies.

pub mod auth;
pub mod call;
pub mod error;
pub mod id;
pub mod request;
pub mod settings;

pub use auth::{
    AccessToken, AccessTokenPayload, AuthOutcome, CurrentTokenResponse, LoginResponse,
    LoginResult,
};
pub use call::BridgeCall;
pub use error::{BridgeError, BridgeResult};
pub use id::{CallId, generate_call_id};
pub use request::{PendingKind, PendingRequest};
pub use settings::BridgeSettings;
