use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::ConfigError;
use feedbackkit_utils::redaction::mask_secret;

/// Default issue type for new Jira issues
pub const DEFAULT_JIRA_ISSUE_TYPE: &str = "Bug";

/// Default ceiling for a single attachment (10 MiB)
pub const DEFAULT_MAX_ATTACHMENT_BYTES: usize = 10 * 1024 * 1024;

/// Default HTTP request timeout in seconds
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

/// Default time the "copied" confirmation stays visible
pub const DEFAULT_COPIED_CONFIRMATION_MS: u64 = 2_000;

/// Default webhook provider name
pub const DEFAULT_WEBHOOK_NAME: &str = "Webhook";

/// Which feedback backend receives submissions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Log only (default)
    #[default]
    #[serde(alias = "none")]
    NoOp,
    /// Fixed result after a short delay
    Preview,
    Jira,
    Webhook,
}

impl ProviderKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NoOp => "noop",
            Self::Preview => "preview",
            Self::Jira => "jira",
            Self::Webhook => "webhook",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "noop" | "none" => Ok(Self::NoOp),
            "preview" => Ok(Self::Preview),
            "jira" => Ok(Self::Jira),
            "webhook" => Ok(Self::Webhook),
            other => Err(ConfigError::invalid(
                "provider",
                format!("unknown provider '{other}' (expected noop, preview, jira or webhook)"),
            )),
        }
    }
}

/// Which hosted model rewrites descriptions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AiProviderKind {
    OpenAi,
    Anthropic,
}

impl AiProviderKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Anthropic => "anthropic",
        }
    }

    /// Environment variable holding this provider's API key
    #[must_use]
    pub fn api_key_env(self) -> &'static str {
        match self {
            Self::OpenAi => "OPENAI_API_KEY",
            Self::Anthropic => "ANTHROPIC_API_KEY",
        }
    }
}

impl fmt::Display for AiProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AiProviderKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(Self::OpenAi),
            "anthropic" | "claude" => Ok(Self::Anthropic),
            other => Err(ConfigError::invalid(
                "ai.provider",
                format!("unknown AI provider '{other}' (expected openai or anthropic)"),
            )),
        }
    }
}

/// Value of a Jira custom field
///
/// In TOML a plain string, an array of strings, or an inline table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum JiraFieldValue {
    String(String),
    Array(Vec<String>),
    Nested(BTreeMap<String, String>),
}

/// Resolved Jira settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JiraSettings {
    /// Site root, without trailing slash (e.g., `https://acme.atlassian.net`)
    pub base_url: String,
    pub email: String,
    pub api_token: String,
    pub project_key: String,
    pub issue_type: String,
    pub custom_fields: BTreeMap<String, JiraFieldValue>,
    pub max_attachment_bytes: usize,
}

/// Resolved webhook settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookSettings {
    pub url: String,
    /// Sent as `Authorization: Bearer <token>` when present
    pub token: Option<String>,
    pub name: String,
    pub headers: BTreeMap<String, String>,
    pub max_attachment_bytes: usize,
}

/// Resolved AI enhancer settings
#[derive(Debug, Clone, PartialEq)]
pub struct AiSettings {
    pub provider: AiProviderKind,
    pub api_key: String,
    /// Provider preset when absent
    pub model: Option<String>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    pub system_prompt: Option<String>,
    /// Overrides the provider's API root (proxies, tests)
    pub base_url: Option<String>,
}

/// Values reported as app metadata
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppSettings {
    pub version: Option<String>,
    pub build: Option<String>,
    pub custom_fields: BTreeMap<String, String>,
}

/// Orchestrator timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlowSettings {
    pub copied_confirmation_delay: Duration,
}

impl Default for FlowSettings {
    fn default() -> Self {
        Self {
            copied_confirmation_delay: Duration::from_millis(DEFAULT_COPIED_CONFIRMATION_MS),
        }
    }
}

/// Effective feedbackkit configuration.
///
/// Built once before a flow starts, from a `feedbackkit.toml` file (explicit
/// or discovered) with environment overrides on top, or programmatically via
/// [`ConfigBuilder`](crate::ConfigBuilder). Backend sections are present only
/// when the selected backend needs them, and every required value in them has
/// been checked.
///
/// # Example
///
/// ```rust,no_run
/// use feedbackkit_config::{Config, ProviderKind};
///
/// let config = Config::discover()?;
/// if config.provider == ProviderKind::Jira {
///     println!("Filing into {}", config.jira.as_ref().unwrap().project_key);
/// }
/// # Ok::<(), feedbackkit_config::ConfigError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub provider: ProviderKind,
    pub request_timeout: Duration,
    pub jira: Option<JiraSettings>,
    pub webhook: Option<WebhookSettings>,
    /// `None` disables description enhancement
    pub ai: Option<AiSettings>,
    pub app: AppSettings,
    pub flow: FlowSettings,
    /// File the values were read from, if any
    pub source: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            provider: ProviderKind::default(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            jira: None,
            webhook: None,
            ai: None,
            app: AppSettings::default(),
            flow: FlowSettings::default(),
            source: None,
        }
    }
}

impl Config {
    /// Effective values as `(key, value)` rows for display, secrets masked
    #[must_use]
    pub fn effective_entries(&self) -> Vec<(String, String)> {
        let mut rows = vec![
            ("provider".to_string(), self.provider.to_string()),
            (
                "provider.timeout_secs".to_string(),
                self.request_timeout.as_secs().to_string(),
            ),
            (
                "source".to_string(),
                self.source
                    .as_ref()
                    .map_or_else(|| "(none)".to_string(), |p| p.display().to_string()),
            ),
        ];

        if let Some(jira) = &self.jira {
            rows.push(("jira.base_url".into(), jira.base_url.clone()));
            rows.push(("jira.email".into(), jira.email.clone()));
            rows.push(("jira.api_token".into(), mask_secret(&jira.api_token)));
            rows.push(("jira.project_key".into(), jira.project_key.clone()));
            rows.push(("jira.issue_type".into(), jira.issue_type.clone()));
            rows.push((
                "jira.max_attachment_bytes".into(),
                jira.max_attachment_bytes.to_string(),
            ));
            for key in jira.custom_fields.keys() {
                rows.push((format!("jira.custom_fields.{key}"), "(set)".into()));
            }
        }

        if let Some(webhook) = &self.webhook {
            rows.push(("webhook.url".into(), webhook.url.clone()));
            rows.push((
                "webhook.token".into(),
                webhook
                    .token
                    .as_deref()
                    .map_or_else(|| "(none)".to_string(), mask_secret),
            ));
            rows.push(("webhook.name".into(), webhook.name.clone()));
            for (name, value) in &webhook.headers {
                rows.push((format!("webhook.headers.{name}"), mask_secret(value)));
            }
        }

        match &self.ai {
            Some(ai) => {
                rows.push(("ai.provider".into(), ai.provider.to_string()));
                rows.push(("ai.api_key".into(), mask_secret(&ai.api_key)));
                rows.push((
                    "ai.model".into(),
                    ai.model.clone().unwrap_or_else(|| "(preset)".into()),
                ));
                if let Some(base_url) = &ai.base_url {
                    rows.push(("ai.base_url".into(), base_url.clone()));
                }
            }
            None => rows.push(("ai.provider".into(), "(disabled)".into())),
        }

        rows.push((
            "app.version".into(),
            self.app.version.clone().unwrap_or_else(|| "(package)".into()),
        ));
        rows.push((
            "app.build".into(),
            self.app.build.clone().unwrap_or_else(|| "(package)".into()),
        ));
        for (key, value) in &self.app.custom_fields {
            rows.push((format!("app.custom_fields.{key}"), value.clone()));
        }
        rows.push((
            "flow.copied_confirmation_ms".into(),
            self.flow.copied_confirmation_delay.as_millis().to_string(),
        ));

        rows
    }
}
