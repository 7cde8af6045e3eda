//! Anthropic Messages API enhancer

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::AiConfig;
use crate::error::AiError;
use crate::user_prompt;
use feedbackkit_core::{DescriptionEnhancer, FeedbackError};
use feedbackkit_utils::http_client::HttpClient;
use feedbackkit_utils::logging::log_backend_error;

/// Default Anthropic API root
const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";

const MESSAGES_PATH: &str = "/v1/messages";

/// Anthropic API version header value
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Rewrites descriptions with a Claude model
#[derive(Debug, Clone)]
pub struct AnthropicEnhancer {
    client: HttpClient,
    endpoint: String,
    config: AiConfig,
}

impl AnthropicEnhancer {
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
            endpoint: format!("{base}{MESSAGES_PATH}"),
            client,
            config,
        })
    }

    fn request_body<'a>(&'a self, user_content: &'a str) -> MessagesRequest<'a> {
        MessagesRequest {
            model: &self.config.model,
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
            system: &self.config.system_prompt,
            messages: vec![RequestMessage {
                role: "user",
                content: user_content,
            }],
        }
    }

    async fn complete(&self, description: &str) -> Result<String, AiError> {
        let user_content = user_prompt(description);
        let request = self
            .client
            .client()
            .post(&self.endpoint)
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&self.request_body(&user_content));

        let response = self.client.send(request, "anthropic").await?;
        let body = response.text().await.map_err(|e| {
            AiError::RequestFailed(format!("Failed to read Anthropic response: {e}"))
        })?;
        parse_response(&body)
    }
}

#[async_trait]
impl DescriptionEnhancer for AnthropicEnhancer {
    async fn enhance(&self, description: &str) -> Result<String, FeedbackError> {
        debug!(
            provider = "anthropic",
            model = %self.config.model,
            max_tokens = self.config.max_tokens,
            "Enhancing description"
        );
        self.complete(description).await.map_err(|e| {
            log_backend_error("anthropic", "enhance", &e);
            FeedbackError::from(e)
        })
    }
}

/// Extract the first text block, trimmed
pub(crate) fn parse_response(body: &str) -> Result<String, AiError> {
    let parsed: MessagesResponse = serde_json::from_str(body).map_err(|e| {
        AiError::InvalidResponse(format!("Failed to parse Anthropic response: {e}"))
    })?;

    let text = parsed
        .content
        .into_iter()
        .filter(|block| block.block_type.as_deref().is_none_or(|t| t == "text"))
        .find_map(|block| block.text)
        .ok_or_else(|| {
            AiError::InvalidResponse("Anthropic response has no text content".to_string())
        })?;

    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(AiError::InvalidResponse(
            "Anthropic response text is empty".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    system: &'a str,
    messages: Vec<RequestMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: Option<String>,
    text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{http_response, serve_once};

    #[test]
    fn test_parse_response_takes_first_text_block() {
        let body = r#"{"content":[{"type":"tool_use","id":"x"},{"type":"text","text":" Better.\n"}]}"#;
        assert_eq!(parse_response(body).unwrap(), "Better.");
    }

    #[test]
    fn test_parse_response_rejects_malformed_bodies() {
        for body in [
            "<html>",
            r#"{"content":[]}"#,
            r#"{"content":[{"type":"text"}]}"#,
            r#"{"content":[{"type":"text","text":""}]}"#,
        ] {
            assert!(
                matches!(parse_response(body), Err(AiError::InvalidResponse(_))),
                "expected InvalidResponse for {body}"
            );
        }
    }

    #[test]
    fn test_request_body_uses_system_field() {
        let enhancer = AnthropicEnhancer::new(AiConfig::anthropic("sk-ant")).unwrap();
        let user = user_prompt("login fails");
        let json = serde_json::to_value(enhancer.request_body(&user)).unwrap();

        assert_eq!(json["model"], "claude-3-5-sonnet-20241022");
        assert!(json["system"].as_str().unwrap().contains("bug report"));
        assert_eq!(json["messages"].as_array().unwrap().len(), 1);
        assert_eq!(
            json["messages"][0]["content"],
            "Improve this bug report description: login fails"
        );
    }

    #[tokio::test]
    async fn test_enhance_against_local_server() {
        let body = r#"{"content":[{"type":"text","text":"Steps to reproduce: ..."}]}"#;
        let base = serve_once(http_response("200 OK", body)).await;
        let enhancer =
            AnthropicEnhancer::new(AiConfig::anthropic("sk").with_base_url(base)).unwrap();

        assert_eq!(
            enhancer.enhance("it broke").await.unwrap(),
            "Steps to reproduce: ..."
        );
    }

    #[tokio::test]
    async fn test_enhance_maps_auth_failure() {
        let base = serve_once(http_response("401 Unauthorized", "bad key")).await;
        let enhancer =
            AnthropicEnhancer::new(AiConfig::anthropic("sk").with_base_url(base)).unwrap();

        let err = enhancer.enhance("it broke").await.unwrap_err();
        assert!(matches!(err, FeedbackError::EnhancementFailed(ref m) if m.contains("401")));
    }
}
