//! Generic JSON webhook provider
//!
//! Posts one JSON document per submission. Attachments travel inline as
//! base64, so they are validated against the size limit before anything is
//! sent. The receiver may answer with `{"id": ..., "url": ...}`; any other
//! 2xx body (including Slack's plain `ok`) yields a locally generated
//! identifier.

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use feedbackkit_config::{
    DEFAULT_MAX_ATTACHMENT_BYTES, DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_WEBHOOK_NAME,
    WebhookSettings,
};
use feedbackkit_core::{
    Attachment, FeedbackError, FeedbackItem, FeedbackMetadata, FeedbackProvider, FeedbackResult,
};
use feedbackkit_utils::http_client::{HttpClient, HttpError};
use feedbackkit_utils::logging::log_backend_error;
use feedbackkit_utils::redaction::mask_secret;

use crate::jira::AI_MARKER;

const SERVICE: &str = "webhook";

/// Webhook endpoint settings
#[derive(Clone, PartialEq, Eq)]
pub struct WebhookConfig {
    pub url: String,
    /// Sent as `Authorization: Bearer <token>`
    pub token: Option<String>,
    /// Provider name reported in results
    pub name: String,
    pub headers: BTreeMap<String, String>,
    pub max_attachment_bytes: usize,
    pub timeout: Duration,
}

impl WebhookConfig {
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            token: None,
            name: DEFAULT_WEBHOOK_NAME.to_string(),
            headers: BTreeMap::new(),
            max_attachment_bytes: DEFAULT_MAX_ATTACHMENT_BYTES,
            timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }

    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_max_attachment_bytes(mut self, bytes: usize) -> Self {
        self.max_attachment_bytes = bytes;
        self
    }

    #[must_use]
    pub fn from_settings(settings: &WebhookSettings, timeout: Duration) -> Self {
        Self {
            url: settings.url.clone(),
            token: settings.token.clone(),
            name: settings.name.clone(),
            headers: settings.headers.clone(),
            max_attachment_bytes: settings.max_attachment_bytes,
            timeout,
        }
    }
}

impl std::fmt::Debug for WebhookConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookConfig")
            .field("url", &self.url)
            .field("token", &self.token.as_deref().map(mask_secret))
            .field("name", &self.name)
            .field("headers", &self.headers.keys().collect::<Vec<_>>())
            .field("max_attachment_bytes", &self.max_attachment_bytes)
            .finish_non_exhaustive()
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WebhookError {
    #[error(transparent)]
    Http(#[from] HttpError),

    #[error("Webhook request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid webhook response: {0}")]
    InvalidResponse(String),
}

impl From<WebhookError> for FeedbackError {
    fn from(err: WebhookError) -> Self {
        match err {
            WebhookError::Http(http) => FeedbackError::from(http),
            WebhookError::RequestFailed(message) => FeedbackError::SubmissionFailed(message),
            WebhookError::InvalidResponse(message) => FeedbackError::InvalidResponse(message),
        }
    }
}

/// Posts feedback to an HTTP endpoint as JSON
#[derive(Debug, Clone)]
pub struct WebhookProvider {
    client: HttpClient,
    config: WebhookConfig,
}

impl WebhookProvider {
    /// # Errors
    ///
    /// Returns `WebhookError::Http` if the HTTP client cannot be constructed
    pub fn new(config: WebhookConfig) -> Result<Self, WebhookError> {
        let client = HttpClient::with_timeout(config.timeout)?;
        Ok(Self { client, config })
    }

    async fn post(&self, payload: &WebhookPayload<'_>) -> Result<String, WebhookError> {
        let mut request = self.client.client().post(&self.config.url).json(payload);
        if let Some(token) = &self.config.token {
            request = request.bearer_auth(token);
        }
        for (name, value) in &self.config.headers {
            request = request.header(name, value);
        }

        let response = self.client.send(request, SERVICE).await?;
        response
            .text()
            .await
            .map_err(|e| WebhookError::RequestFailed(format!("Failed to read webhook response: {e}")))
    }

    async fn submit_inner(
        &self,
        feedback: &FeedbackItem,
        metadata: &FeedbackMetadata,
    ) -> Result<FeedbackResult, FeedbackError> {
        for attachment in &feedback.attachments {
            attachment.validate(self.config.max_attachment_bytes)?;
        }

        let payload = WebhookPayload::build(feedback, metadata)?;
        debug!(
            url = %self.config.url,
            attachments = payload.attachments.len(),
            "Posting feedback to webhook"
        );
        let body = self.post(&payload).await?;
        let result = parse_result(&body, &self.config.name);
        info!(identifier = %result.identifier, provider = %result.provider_name, "Webhook accepted feedback");
        Ok(result)
    }
}

#[async_trait]
impl FeedbackProvider for WebhookProvider {
    fn name(&self) -> &str {
        &self.config.name
    }

    async fn submit(
        &self,
        feedback: &FeedbackItem,
        metadata: &FeedbackMetadata,
    ) -> Result<FeedbackResult, FeedbackError> {
        self.submit_inner(feedback, metadata).await.inspect_err(|e| {
            log_backend_error(SERVICE, "submit", e);
        })
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct WebhookPayload<'a> {
    title: &'a str,
    description: &'a str,
    is_ai_generated: bool,
    metadata: &'a FeedbackMetadata,
    attachments: Vec<AttachmentPayload>,
    /// Pre-rendered summary for chat-style receivers
    text: String,
}

#[derive(Debug, Serialize)]
struct AttachmentPayload {
    filename: String,
    mime_type: String,
    size: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    caption: Option<String>,
    data_base64: String,
}

impl<'a> WebhookPayload<'a> {
    pub(crate) fn build(
        feedback: &'a FeedbackItem,
        metadata: &'a FeedbackMetadata,
    ) -> Result<Self, FeedbackError> {
        let attachments = feedback
            .attachments
            .iter()
            .map(AttachmentPayload::encode)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            title: &feedback.title,
            description: feedback.description_or_placeholder(),
            is_ai_generated: feedback.is_ai_generated,
            metadata,
            attachments,
            text: summary_text(feedback, metadata),
        })
    }
}

impl AttachmentPayload {
    fn encode(attachment: &Attachment) -> Result<Self, FeedbackError> {
        Ok(Self {
            filename: attachment.filename(),
            mime_type: attachment.mime_type()?.to_string(),
            size: attachment.len(),
            caption: attachment.caption.clone(),
            data_base64: BASE64.encode(attachment.bytes()),
        })
    }
}

pub(crate) fn summary_text(feedback: &FeedbackItem, metadata: &FeedbackMetadata) -> String {
    let mut text = format!(
        "*{}*\n{}\n\nApp {} (Build {}) | {} | {} | {}",
        feedback.title,
        feedback.description_or_placeholder(),
        metadata.app_version,
        metadata.app_build,
        metadata.os_version,
        metadata.device_model,
        metadata.locale,
    );
    if !feedback.attachments.is_empty() {
        text.push_str(&format!("\nAttachments: {}", feedback.attachments.len()));
    }
    if feedback.is_ai_generated {
        text.push('\n');
        text.push_str(AI_MARKER);
    }
    text
}

/// Identifier from `id`, `key` or `identifier`; otherwise a generated one
pub(crate) fn parse_result(body: &str, provider_name: &str) -> FeedbackResult {
    let parsed = serde_json::from_str::<Value>(body).ok();
    let field = |name: &str| {
        parsed.as_ref().and_then(|v| v.get(name)).and_then(|v| match v {
            Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
    };

    let identifier = ["id", "key", "identifier"]
        .into_iter()
        .find_map(&field)
        .unwrap_or_else(|| {
            let id = Uuid::new_v4().simple().to_string();
            format!("webhook-{}", &id[..8])
        });
    let url = field("url");

    FeedbackResult::new(identifier, url, provider_name)
}
