use feedbackkit_utils::error::FeedbackError;
use std::path::PathBuf;
use thiserror::Error;

/// Configuration loading and validation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A value the selected backend needs is absent from both file and environment.
    /// Carries the environment variable that would supply it.
    #[error("Missing required configuration: {0}")]
    MissingRequired(String),

    #[error("Invalid configuration value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    #[error("Failed to parse config file {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Failed to read config file {path}: {message}")]
    Io { path: PathBuf, message: String },
}

impl ConfigError {
    pub(crate) fn invalid(key: &str, value: impl Into<String>) -> Self {
        Self::InvalidValue {
            key: key.to_string(),
            value: value.into(),
        }
    }

    /// Actionable hint for the CLI
    #[must_use]
    pub fn suggestion(&self) -> String {
        match self {
            Self::MissingRequired(key) => {
                format!("Set {key} in the environment or the matching key in feedbackkit.toml")
            }
            Self::InvalidValue { key, .. } => format!("Fix the value of '{key}'"),
            Self::Parse { path, .. } => format!("Check the TOML syntax of {}", path.display()),
            Self::Io { path, .. } => format!("Check that {} exists and is readable", path.display()),
        }
    }
}

impl From<ConfigError> for FeedbackError {
    fn from(err: ConfigError) -> Self {
        FeedbackError::InvalidConfiguration(err.to_string())
    }
}
