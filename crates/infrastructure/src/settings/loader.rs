//! YAML settings loader with environment overrides.
//!
//! Layering, lowest to highest precedence:
//! ```text
//! BridgeSettings::default()
//!   < settings file (YAML, optional)
//!     < IDBRIDGE_* environment variables
//! ```

use std::path::{Path, PathBuf};

use idbridge_domain::BridgeSettings;
use tracing::debug;

/// Prefix shared by every environment override.
pub const ENV_PREFIX: &str = "IDBRIDGE_";

/// Errors that can occur while loading settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// The settings file exists but could not be read.
    #[error("failed to read settings file {path}: {source}")]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The settings file is not valid YAML for [`BridgeSettings`].
    #[error("invalid settings file {path}: {source}")]
    Yaml {
        /// File that failed.
        path: PathBuf,
        /// Parser error.
        #[source]
        source: serde_yaml::Error,
    },

    /// An environment override holds a value of the wrong type.
    #[error("invalid value '{value}' for {key}")]
    InvalidOverride {
        /// Variable name.
        key: String,
        /// Offending value.
        value: String,
    },
}

/// Loads [`BridgeSettings`].
#[derive(Debug, Clone, Default)]
pub struct SettingsLoader {
    file: Option<PathBuf>,
}

impl SettingsLoader {
    /// Loader that uses defaults plus environment overrides.
    #[must_use]
    pub const fn new() -> Self {
        Self { file: None }
    }

    /// Loader that also reads `path`; a missing file is not an error.
    #[must_use]
    pub fn with_file(path: impl AsRef<Path>) -> Self {
        Self {
            file: Some(path.as_ref().to_path_buf()),
        }
    }

    /// Loads settings using the process environment for overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or an override
    /// is malformed.
    pub async fn load(&self) -> Result<BridgeSettings, SettingsError> {
        self.load_with(|key| std::env::var(key).ok()).await
    }

    /// Loads settings resolving overrides through `lookup`.
    ///
    /// # Errors
    ///
    /// See [`SettingsLoader::load`].
    pub async fn load_with(
        &self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<BridgeSettings, SettingsError> {
        let settings = match &self.file {
            Some(path) => read_file(path).await?,
            None => BridgeSettings::default(),
        };
        apply_env_overrides(settings, lookup)
    }
}

async fn read_file(path: &Path) -> Result<BridgeSettings, SettingsError> {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "settings file not found, using defaults");
            return Ok(BridgeSettings::default());
        }
        Err(source) => {
            return Err(SettingsError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    if content.trim().is_empty() {
        return Ok(BridgeSettings::default());
    }

    serde_yaml::from_str(&content).map_err(|source| SettingsError::Yaml {
        path: path.to_path_buf(),
        source,
    })
}

/// Applies `IDBRIDGE_*` overrides found through `lookup`.
///
/// An empty `IDBRIDGE_STALE_PENDING_AFTER_SECS` disables stale eviction.
///
/// # Errors
///
/// Returns [`SettingsError::InvalidOverride`] for values that do not parse.
pub fn apply_env_overrides(
    mut settings: BridgeSettings,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<BridgeSettings, SettingsError> {
    let var = |name: &str| {
        let key = format!("{ENV_PREFIX}{name}");
        lookup(&key).map(|value| (key, value))
    };

    if let Some((_, value)) = var("LOG_FILTER") {
        settings.log_filter = value;
    }
    if let Some((_, value)) = var("GRAPH_API_BASE_URL") {
        settings.graph_api_base_url = value;
    }
    if let Some((_, value)) = var("GRAPH_API_VERSION") {
        settings.graph_api_version = value;
    }
    if let Some((key, value)) = var("STALE_PENDING_AFTER_SECS") {
        settings.stale_pending_after_secs = if value.trim().is_empty() {
            None
        } else {
            Some(
                value
                    .trim()
                    .parse()
                    .map_err(|_| SettingsError::InvalidOverride { key, value })?,
            )
        };
    }

    Ok(settings)
}
