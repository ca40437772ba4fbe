//! Settings loading from YAML files and the environment.

mod loader;

pub use loader::{ENV_PREFIX, SettingsError, SettingsLoader, apply_env_overrides};
