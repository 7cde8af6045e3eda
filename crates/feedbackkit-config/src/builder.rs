use std::time::Duration;

use crate::discovery::RawConfig;
use crate::error::ConfigError;
use crate::model::{AiProviderKind, Config, JiraFieldValue, ProviderKind};

impl Config {
    /// Create a builder for programmatic configuration.
    ///
    /// Use this when embedding feedbackkit in an application that owns its
    /// settings. The builder never reads files or environment variables.
    ///
    /// # Example
    ///
    /// ```rust
    /// use feedbackkit_config::{Config, ProviderKind};
    ///
    /// let config = Config::builder()
    ///     .jira("https://acme.atlassian.net", "bot@acme.test", "token", "PROJ")
    ///     .jira_issue_type("Task")
    ///     .build()
    ///     .expect("valid config");
    /// assert_eq!(config.provider, ProviderKind::Jira);
    /// ```
    #[must_use]
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }
}

/// Builder for [`Config`].
///
/// Values go through the same validation as file and environment values.
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    raw: RawConfig,
}

impl ConfigBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn provider(mut self, kind: ProviderKind) -> Self {
        self.raw.provider.kind = Some(kind.as_str().to_string());
        self
    }

    /// HTTP request timeout for every backend
    #[must_use]
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.raw.provider.timeout_secs = Some(timeout.as_secs());
        self
    }

    /// Select Jira and set its connection values
    #[must_use]
    pub fn jira(
        mut self,
        base_url: impl Into<String>,
        email: impl Into<String>,
        api_token: impl Into<String>,
        project_key: impl Into<String>,
    ) -> Self {
        self.raw.provider.kind = Some(ProviderKind::Jira.as_str().to_string());
        self.raw.jira.base_url = Some(base_url.into());
        self.raw.jira.email = Some(email.into());
        self.raw.jira.api_token = Some(api_token.into());
        self.raw.jira.project_key = Some(project_key.into());
        self
    }

    #[must_use]
    pub fn jira_issue_type(mut self, issue_type: impl Into<String>) -> Self {
        self.raw.jira.issue_type = Some(issue_type.into());
        self
    }

    #[must_use]
    pub fn jira_custom_field(mut self, key: impl Into<String>, value: JiraFieldValue) -> Self {
        self.raw.jira.custom_fields.insert(key.into(), value);
        self
    }

    /// Per-attachment size ceiling for Jira and webhook uploads
    #[must_use]
    pub fn max_attachment_bytes(mut self, bytes: usize) -> Self {
        self.raw.jira.max_attachment_bytes = Some(bytes);
        self.raw.webhook.max_attachment_bytes = Some(bytes);
        self
    }

    /// Select the webhook backend
    #[must_use]
    pub fn webhook(mut self, url: impl Into<String>) -> Self {
        self.raw.provider.kind = Some(ProviderKind::Webhook.as_str().to_string());
        self.raw.webhook.url = Some(url.into());
        self
    }

    #[must_use]
    pub fn webhook_token(mut self, token: impl Into<String>) -> Self {
        self.raw.webhook.token = Some(token.into());
        self
    }

    #[must_use]
    pub fn webhook_name(mut self, name: impl Into<String>) -> Self {
        self.raw.webhook.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn webhook_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.raw.webhook.headers.insert(name.into(), value.into());
        self
    }

    /// Enable description enhancement
    #[must_use]
    pub fn ai(mut self, provider: AiProviderKind, api_key: impl Into<String>) -> Self {
        self.raw.ai.provider = Some(provider.as_str().to_string());
        self.raw.ai.api_key = Some(api_key.into());
        self
    }

    #[must_use]
    pub fn ai_model(mut self, model: impl Into<String>) -> Self {
        self.raw.ai.model = Some(model.into());
        self
    }

    #[must_use]
    pub fn ai_max_tokens(mut self, max_tokens: u32) -> Self {
        self.raw.ai.max_tokens = Some(max_tokens);
        self
    }

    #[must_use]
    pub fn ai_temperature(mut self, temperature: f32) -> Self {
        self.raw.ai.temperature = Some(temperature);
        self
    }

    #[must_use]
    pub fn ai_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.raw.ai.system_prompt = Some(prompt.into());
        self
    }

    #[must_use]
    pub fn ai_base_url(mut self, url: impl Into<String>) -> Self {
        self.raw.ai.base_url = Some(url.into());
        self
    }

    #[must_use]
    pub fn app_version(mut self, version: impl Into<String>) -> Self {
        self.raw.app.version = Some(version.into());
        self
    }

    #[must_use]
    pub fn app_build(mut self, build: impl Into<String>) -> Self {
        self.raw.app.build = Some(build.into());
        self
    }

    #[must_use]
    pub fn app_custom_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.raw.app.custom_fields.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn copied_confirmation_delay(mut self, delay: Duration) -> Self {
        self.raw.flow.copied_confirmation_ms =
            Some(u64::try_from(delay.as_millis()).unwrap_or(u64::MAX));
        self
    }

    /// Validate and build the configuration
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when a selected backend lacks a required value
    /// or a value is out of range.
    pub fn build(self) -> Result<Config, ConfigError> {
        self.raw.resolve(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults_match_default_config() {
        assert_eq!(ConfigBuilder::new().build().unwrap(), Config::default());
    }

    #[test]
    fn test_builder_jira() {
        let config = Config::builder()
            .jira("https://acme.atlassian.net/", "bot@acme.test", "token", "PROJ")
            .jira_custom_field("customfield_1", JiraFieldValue::String("iOS".into()))
            .max_attachment_bytes(1024)
            .build()
            .unwrap();

        let jira = config.jira.unwrap();
        assert_eq!(jira.base_url, "https://acme.atlassian.net");
        assert_eq!(jira.issue_type, "Bug");
        assert_eq!(jira.max_attachment_bytes, 1024);
        assert_eq!(jira.custom_fields.len(), 1);
    }

    #[test]
    fn test_builder_webhook_and_ai() {
        let config = Config::builder()
            .webhook("https://hooks.test/fb")
            .webhook_token("secret")
            .webhook_name("Slack")
            .webhook_header("X-Team", "mobile")
            .ai(AiProviderKind::OpenAi, "sk-test")
            .ai_model("gpt-4o")
            .ai_temperature(0.3)
            .request_timeout(Duration::from_secs(10))
            .copied_confirmation_delay(Duration::from_millis(250))
            .app_version("3.1.0")
            .build()
            .unwrap();

        assert_eq!(config.provider, ProviderKind::Webhook);
        let webhook = config.webhook.unwrap();
        assert_eq!(webhook.name, "Slack");
        assert_eq!(webhook.token.as_deref(), Some("secret"));
        assert_eq!(webhook.headers.get("X-Team").map(String::as_str), Some("mobile"));
        let ai = config.ai.unwrap();
        assert_eq!(ai.model.as_deref(), Some("gpt-4o"));
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert_eq!(
            config.flow.copied_confirmation_delay,
            Duration::from_millis(250)
        );
        assert_eq!(config.app.version.as_deref(), Some("3.1.0"));
    }

    #[test]
    fn test_builder_validation_errors() {
        let err = Config::builder()
            .provider(ProviderKind::Webhook)
            .build()
            .unwrap_err();
        assert_eq!(err, ConfigError::MissingRequired("WEBHOOK_URL".into()));

        let err = Config::builder()
            .jira("https://a.test", "e", "t", "P")
            .max_attachment_bytes(0)
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }
}
