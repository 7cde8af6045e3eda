//! OpenAI chat completions enhancer

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::AiConfig;
use crate::error::AiError;
use crate::user_prompt;
use feedbackkit_core::{DescriptionEnhancer, FeedbackError};
use feedbackkit_utils::http_client::HttpClient;
use feedbackkit_utils::logging::log_backend_error;

/// Default OpenAI API root
const DEFAULT_BASE_URL: &str = "https://api.openai.com";

const COMPLETIONS_PATH: &str = "/v1/chat/completions";

/// Rewrites descriptions with an OpenAI chat model
#[derive(Debug, Clone)]
pub struct OpenAiEnhancer {
    client: HttpClient,
    endpoint: String,
    config: AiConfig,
}

impl OpenAiEnhancer {
    /// # Errors
    ///
    /// Returns `AiError::RequestFailed` if the HTTP client cannot be constructed
    pub fn new(config: AiConfig) -> Result<Self, AiError> {
        let client = HttpClient::with_timeout(config.timeout)?;
        let base = config
            .base_url
            .as_deref()
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/');
        Ok(Self {
            endpoint: format!("{base}{COMPLETIONS_PATH}"),
            client,
            config,
        })
    }

    fn request_body<'a>(&'a self, user_content: &'a str) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &self.config.system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: user_content,
                },
            ],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        }
    }

    async fn complete(&self, description: &str) -> Result<String, AiError> {
        let user_content = user_prompt(description);
        let request = self
            .client
            .client()
            .post(&self.endpoint)
            .bearer_auth(&self.config.api_key)
            .json(&self.request_body(&user_content));

        let response = self.client.send(request, "openai").await?;
        let body = response
            .text()
            .await
            .map_err(|e| AiError::RequestFailed(format!("Failed to read OpenAI response: {e}")))?;
        parse_response(&body)
    }
}

#[async_trait]
impl DescriptionEnhancer for OpenAiEnhancer {
    async fn enhance(&self, description: &str) -> Result<String, FeedbackError> {
        debug!(
            provider = "openai",
            model = %self.config.model,
            max_tokens = self.config.max_tokens,
            "Enhancing description"
        );
        self.complete(description).await.map_err(|e| {
            log_backend_error("openai", "enhance", &e);
            FeedbackError::from(e)
        })
    }
}

/// Extract `choices[0].message.content`, trimmed
pub(crate) fn parse_response(body: &str) -> Result<String, AiError> {
    let parsed: ChatResponse = serde_json::from_str(body)
        .map_err(|e| AiError::InvalidResponse(format!("Failed to parse OpenAI response: {e}")))?;

    let content = parsed
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message)
        .and_then(|message| message.content)
        .ok_or_else(|| {
            AiError::InvalidResponse("OpenAI response has no message content".to_string())
        })?;

    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(AiError::InvalidResponse(
            "OpenAI response content is empty".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ResponseMessage>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}
