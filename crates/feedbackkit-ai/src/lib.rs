//! AI description enhancers for feedbackkit
//!
//! Two hosted backends implement [`DescriptionEnhancer`]:
//!
//! - [`OpenAiEnhancer`]: `POST /v1/chat/completions` with bearer auth
//! - [`AnthropicEnhancer`]: `POST /v1/messages` with `x-api-key`
//!
//! Both send the configured system prompt plus one user message and return the
//! model's text trimmed. Neither retries.

mod anthropic;
mod config;
mod error;
mod openai;

use std::sync::Arc;
use tracing::info;

pub use anthropic::AnthropicEnhancer;
pub use config::{
    ANTHROPIC_DEFAULT_MODEL, AiConfig, AiProvider, DEFAULT_MAX_TOKENS, DEFAULT_SYSTEM_PROMPT,
    DEFAULT_TEMPERATURE, OPENAI_DEFAULT_MODEL,
};
pub use error::AiError;
pub use openai::OpenAiEnhancer;

use feedbackkit_config::Config;
use feedbackkit_core::{DescriptionEnhancer, NoOpEnhancer};

/// Prefix of the user message sent to every model
pub const USER_PROMPT_PREFIX: &str = "Improve this bug report description: ";

pub(crate) fn user_prompt(description: &str) -> String {
    format!("{USER_PROMPT_PREFIX}{description}")
}

/// Construct the enhancer for an [`AiConfig`]
///
/// # Errors
///
/// Returns `AiError::RequestFailed` if the HTTP client cannot be constructed
pub fn enhancer_for(config: AiConfig) -> Result<Arc<dyn DescriptionEnhancer>, AiError> {
    Ok(match config.provider {
        AiProvider::OpenAi => Arc::new(OpenAiEnhancer::new(config)?),
        AiProvider::Anthropic => Arc::new(AnthropicEnhancer::new(config)?),
    })
}

/// Construct the configured enhancer, or [`NoOpEnhancer`] when AI is disabled
///
/// # Errors
///
/// Returns `AiError::RequestFailed` if the HTTP client cannot be constructed
pub fn from_config(config: &Config) -> Result<Arc<dyn DescriptionEnhancer>, AiError> {
    match &config.ai {
        Some(settings) => {
            let ai_config = AiConfig::from_settings(settings, config.request_timeout);
            info!(
                provider = %ai_config.provider,
                model = %ai_config.model,
                "Description enhancement enabled"
            );
            enhancer_for(ai_config)
        }
        None => Ok(Arc::new(NoOpEnhancer)),
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Answer a single connection with a canned response; returns the base URL
    pub async fn serve_once(response: String) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            if let Ok((mut stream, _)) = listener.accept().await {
                let mut buf = [0u8; 8192];
                let _ = stream.read(&mut buf).await;
                let _ = stream.write_all(response.as_bytes()).await;
                let _ = stream.shutdown().await;
            }
        });
        format!("http://{addr}")
    }

    pub fn http_response(status_line: &str, body: &str) -> String {
        format!(
            "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use feedbackkit_config::{AiProviderKind, ConfigBuilder};

    #[tokio::test]
    async fn test_from_config_without_ai_echoes() {
        let enhancer = from_config(&Config::default()).unwrap();
        assert_eq!(enhancer.enhance("same").await.unwrap(), "same");
    }

    #[test]
    fn test_from_config_with_ai_builds_backend() {
        let config = ConfigBuilder::new()
            .ai(AiProviderKind::Anthropic, "sk-ant")
            .build()
            .unwrap();
        assert!(from_config(&config).is_ok());
    }

    #[test]
    fn test_user_prompt() {
        assert_eq!(
            user_prompt("x"),
            "Improve this bug report description: x"
        );
    }
}
