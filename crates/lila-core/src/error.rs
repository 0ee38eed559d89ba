use std::path::PathBuf;
use thiserror::Error;

/// Result alias for lila operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for lila operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error("Failed to read settings at {path}: {source}")]
    SettingsRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse settings at {path}: {source}")]
    SettingsParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Unknown project variant `{0}` (expected base, react, vue or react-vue)")]
    UnknownVariant(String),
}

impl Error {
    /// Whether this error is a missing or malformed collaborator.
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }
}

/// A required collaborator is absent or has the wrong shape.
///
/// Raised before any collaborator is invoked.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("bundler config generator not configured")]
    MissingConfigGenerator,

    #[error("bundler config generator should return a config factory")]
    InvalidConfigGenerator,
}
