//! Enhancer configuration and presets

use std::time::Duration;

use feedbackkit_config::{AiSettings, DEFAULT_REQUEST_TIMEOUT_SECS};
pub use feedbackkit_config::AiProviderKind as AiProvider;

use crate::error::AiError;
use feedbackkit_utils::redaction::mask_secret;

/// Default completion budget
pub const DEFAULT_MAX_TOKENS: u32 = 500;

/// Default sampling temperature
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Default OpenAI model
pub const OPENAI_DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Default Anthropic model
pub const ANTHROPIC_DEFAULT_MODEL: &str = "claude-3-5-sonnet-20241022";

/// Instruction sent as the system prompt
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant that improves bug report \
descriptions. Make them clear, concise, and professional while preserving all technical details. \
Keep the improved description focused and under 500 characters unless more detail is necessary.";

/// Settings for one enhancer instance
#[derive(Clone, PartialEq)]
pub struct AiConfig {
    pub provider: AiProvider,
    pub api_key: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub system_prompt: String,
    /// API root override, e.g. `http://localhost:8080` (no path)
    pub base_url: Option<String>,
    pub timeout: Duration,
}

impl AiConfig {
    /// Preset for a provider with its default model
    #[must_use]
    pub fn new(provider: AiProvider, api_key: impl Into<String>) -> Self {
        Self {
            provider,
            api_key: api_key.into(),
            model: default_model(provider).to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            base_url: None,
            timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }

    /// OpenAI preset (`gpt-4o-mini`)
    #[must_use]
    pub fn openai(api_key: impl Into<String>) -> Self {
        Self::new(AiProvider::OpenAi, api_key)
    }

    /// Anthropic preset (`claude-3-5-sonnet-20241022`)
    #[must_use]
    pub fn anthropic(api_key: impl Into<String>) -> Self {
        Self::new(AiProvider::Anthropic, api_key)
    }

    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Apply resolved file/environment settings over the provider preset
    #[must_use]
    pub fn from_settings(settings: &AiSettings, timeout: Duration) -> Self {
        let mut config = Self::new(settings.provider, settings.api_key.clone());
        if let Some(model) = &settings.model {
            config.model.clone_from(model);
        }
        if let Some(max_tokens) = settings.max_tokens {
            config.max_tokens = max_tokens;
        }
        if let Some(temperature) = settings.temperature {
            config.temperature = temperature;
        }
        if let Some(prompt) = &settings.system_prompt {
            config.system_prompt.clone_from(prompt);
        }
        config.base_url.clone_from(&settings.base_url);
        config.timeout = timeout;
        config
    }

    /// Read `AI_PROVIDER` and the matching API key from the process environment
    ///
    /// # Errors
    ///
    /// Returns `AiError::MissingEnvironmentVariable` naming the first absent variable.
    pub fn from_env() -> Result<Self, AiError> {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    /// [`AiConfig::from_env`] with an injectable lookup
    ///
    /// # Errors
    ///
    /// Returns `AiError::MissingEnvironmentVariable` naming the first absent variable.
    pub fn from_env_with(env: impl Fn(&str) -> Option<String>) -> Result<Self, AiError> {
        let var = |key: &str| env(key).filter(|value| !value.trim().is_empty());

        let provider = var("AI_PROVIDER")
            .and_then(|p| p.parse::<AiProvider>().ok())
            .ok_or_else(|| AiError::MissingEnvironmentVariable("AI_PROVIDER".to_string()))?;
        let key_env = provider.api_key_env();
        let api_key =
            var(key_env).ok_or_else(|| AiError::MissingEnvironmentVariable(key_env.to_string()))?;

        let mut config = Self::new(provider, api_key);
        if let Some(model) = var("AI_MODEL") {
            config.model = model;
        }
        Ok(config)
    }
}

impl std::fmt::Debug for AiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AiConfig")
            .field("provider", &self.provider)
            .field("api_key", &mask_secret(&self.api_key))
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

fn default_model(provider: AiProvider) -> &'static str {
    match provider {
        AiProvider::OpenAi => OPENAI_DEFAULT_MODEL,
        AiProvider::Anthropic => ANTHROPIC_DEFAULT_MODEL,
    }
}
