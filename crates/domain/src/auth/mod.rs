//! Authentication domain types

mod outcome;
mod types;

pub use outcome::{AccessTokenPayload, AuthOutcome, CurrentTokenResponse, LoginResponse};
pub use types::{AccessToken, LoginResult};
