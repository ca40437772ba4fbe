//! Application use cases (the bridge's public operation surface).

mod app_events;
mod current_token;
mod get_profile;
mod login;
mod logout;
mod reauthorize;
#[cfg(test)]
pub(crate) mod test_support;

pub use app_events::RecordAppEvents;
pub use current_token::GetCurrentAccessToken;
pub use get_profile::GetProfile;
pub use login::Login;
pub use logout::Logout;
pub use reauthorize::Reauthorize;
