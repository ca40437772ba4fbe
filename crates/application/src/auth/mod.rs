//! Authentication core of the bridge.
//!
//! This module provides:
//! - Nonce hashing for the login configuration
//! - Normalization of SDK results into the response contract
//! - The pending-call correlator matching SDK callbacks to host calls

mod correlator;
mod nonce;
mod normalize;

pub use correlator::{Correlator, SlotState};
pub use nonce::hash_nonce;
pub use normalize::{
    TIMESTAMP_FORMAT, format_timestamp, normalize_login, normalize_permission_delta,
    normalize_token, permissions_to_wire,
};
