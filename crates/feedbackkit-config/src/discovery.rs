use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::ConfigError;
use crate::model::{AiProviderKind, Config, JiraFieldValue};

/// File searched for upward from the working directory
pub const CONFIG_FILE_NAME: &str = "feedbackkit.toml";

/// Environment variable naming an explicit config file
pub const CONFIG_PATH_ENV: &str = "FEEDBACKKIT_CONFIG";

/// Unvalidated configuration layer.
///
/// Mirrors the TOML file structure. Every value is optional here; the file,
/// the environment, and the builder each fill in what they know before
/// [`RawConfig::resolve`] checks the result.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub(crate) struct RawConfig {
    #[serde(default)]
    pub provider: RawProvider,
    #[serde(default)]
    pub jira: RawJira,
    #[serde(default)]
    pub webhook: RawWebhook,
    #[serde(default)]
    pub ai: RawAi,
    #[serde(default)]
    pub app: RawApp,
    #[serde(default)]
    pub flow: RawFlow,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub(crate) struct RawProvider {
    pub kind: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub(crate) struct RawJira {
    pub base_url: Option<String>,
    pub email: Option<String>,
    pub api_token: Option<String>,
    pub project_key: Option<String>,
    pub issue_type: Option<String>,
    #[serde(default)]
    pub custom_fields: BTreeMap<String, JiraFieldValue>,
    pub max_attachment_bytes: Option<usize>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub(crate) struct RawWebhook {
    pub url: Option<String>,
    pub token: Option<String>,
    pub name: Option<String>,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    pub max_attachment_bytes: Option<usize>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub(crate) struct RawAi {
    pub provider: Option<String>,
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    pub system_prompt: Option<String>,
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub(crate) struct RawApp {
    pub version: Option<String>,
    pub build: Option<String>,
    #[serde(default)]
    pub custom_fields: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub(crate) struct RawFlow {
    pub copied_confirmation_ms: Option<u64>,
}

impl RawConfig {
    /// Parse a TOML document
    pub(crate) fn from_toml(content: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Load a config file. A missing file is an error: the caller named it.
    pub(crate) fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_toml(&content, path)
    }

    /// Apply environment overrides on top of file values
    ///
    /// Empty variables are treated as unset.
    pub(crate) fn apply_env(&mut self, env: &impl Fn(&str) -> Option<String>) {
        let var = |key: &str| env(key).filter(|value| !value.trim().is_empty());

        set_if_some(&mut self.provider.kind, var("FEEDBACK_PROVIDER"));

        set_if_some(&mut self.jira.base_url, var("JIRA_BASE_URL"));
        set_if_some(&mut self.jira.email, var("JIRA_EMAIL"));
        set_if_some(&mut self.jira.api_token, var("JIRA_API_TOKEN"));
        set_if_some(&mut self.jira.project_key, var("JIRA_PROJECT_KEY"));
        set_if_some(&mut self.jira.issue_type, var("JIRA_ISSUE_TYPE"));

        set_if_some(&mut self.webhook.url, var("WEBHOOK_URL"));
        set_if_some(&mut self.webhook.token, var("WEBHOOK_TOKEN"));

        set_if_some(&mut self.ai.provider, var("AI_PROVIDER"));
        set_if_some(&mut self.ai.model, var("AI_MODEL"));

        // The key variable depends on the provider, so this runs after AI_PROVIDER.
        // An unparseable provider is reported later by resolve.
        if let Some(kind) = self
            .ai
            .provider
            .as_deref()
            .and_then(|p| p.parse::<AiProviderKind>().ok())
        {
            set_if_some(&mut self.ai.api_key, var(kind.api_key_env()));
        }
    }
}

fn set_if_some(slot: &mut Option<String>, value: Option<String>) {
    if value.is_some() {
        *slot = value;
    }
}

impl Config {
    /// Discover and load configuration using the working directory and
    /// the process environment
    ///
    /// An explicit path in `FEEDBACKKIT_CONFIG` wins over discovery.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when a file cannot be read or parsed, or when the
    /// selected backends lack required values.
    pub fn discover() -> Result<Self, ConfigError> {
        Self::load(None)
    }

    /// Load configuration from an explicit file, or discover one when `None`
    ///
    /// # Errors
    ///
    /// See [`Config::discover`].
    pub fn load(explicit_path: Option<&Path>) -> Result<Self, ConfigError> {
        let start_dir = std::env::current_dir().map_err(|e| ConfigError::Io {
            path: PathBuf::from("."),
            message: format!("Failed to get current directory: {e}"),
        })?;
        Self::load_with(&start_dir, explicit_path, |key| std::env::var(key).ok())
    }

    /// Load configuration from a start directory and an environment lookup
    ///
    /// This is the path-driven variant used by tests to avoid process-global
    /// state. Precedence: environment > file > defaults.
    ///
    /// # Errors
    ///
    /// See [`Config::discover`].
    pub fn load_with(
        start_dir: &Path,
        explicit_path: Option<&Path>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let config_path = match explicit_path {
            Some(path) => Some(path.to_path_buf()),
            None => match env(CONFIG_PATH_ENV).filter(|p| !p.trim().is_empty()) {
                Some(path) => Some(PathBuf::from(path)),
                None => Self::discover_config_file_from(start_dir),
            },
        };

        let mut raw = match &config_path {
            Some(path) => {
                debug!(path = %path.display(), "Loading config file");
                RawConfig::from_file(path)?
            }
            None => {
                debug!("No config file found, using environment and defaults");
                RawConfig::default()
            }
        };

        raw.apply_env(&env);
        raw.resolve(config_path)
    }

    /// Parse configuration from TOML text, without environment overrides
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` for malformed TOML and the validation
    /// errors of [`Config::discover`].
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        RawConfig::from_toml(content, Path::new("<inline>"))?.resolve(None)
    }

    /// Search for `feedbackkit.toml` from `start_dir` upward
    ///
    /// The search stops at the filesystem root or at a repository root
    /// (`.git`, `.hg`, `.svn`), whichever comes first.
    #[must_use]
    pub fn discover_config_file_from(start_dir: &Path) -> Option<PathBuf> {
        let mut current = Some(start_dir);

        while let Some(dir) = current {
            let candidate = dir.join(CONFIG_FILE_NAME);
            if candidate.is_file() {
                return Some(candidate);
            }

            if dir.join(".git").exists() || dir.join(".hg").exists() || dir.join(".svn").exists()
            {
                break;
            }

            current = dir.parent();
        }

        None
    }
}
