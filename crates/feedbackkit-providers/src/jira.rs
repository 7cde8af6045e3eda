//! Jira Cloud provider (REST API v3)
//!
//! Submission is two-phase: the issue is created first, then each attachment
//! is uploaded to it. Attachments are validated before the issue exists, so a
//! rejected attachment never leaves an orphaned issue behind. An upload
//! failure after creation is reported as
//! [`FeedbackError::PartialSubmission`] naming the created key.

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use serde_json::{Map, Value, json};
use std::collections::BTreeMap;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use feedbackkit_config::{
    DEFAULT_JIRA_ISSUE_TYPE, DEFAULT_MAX_ATTACHMENT_BYTES, DEFAULT_REQUEST_TIMEOUT_SECS,
    JiraFieldValue, JiraSettings,
};
use feedbackkit_core::{
    Attachment, AttachmentKind, FeedbackError, FeedbackItem, FeedbackMetadata, FeedbackProvider,
    FeedbackResult,
};
use feedbackkit_utils::http_client::{HttpClient, HttpError};
use feedbackkit_utils::logging::log_backend_error;
use feedbackkit_utils::redaction::mask_secret;

/// Marker appended to AI-rewritten descriptions
pub const AI_MARKER: &str = "_Description enhanced by AI_";

const SERVICE: &str = "jira";

/// Jira connection settings
#[derive(Clone, PartialEq, Eq)]
pub struct JiraConfig {
    /// Site root, e.g. `https://acme.atlassian.net`
    pub base_url: String,
    pub email: String,
    pub api_token: String,
    pub project_key: String,
    pub issue_type: String,
    pub custom_fields: BTreeMap<String, JiraFieldValue>,
    pub max_attachment_bytes: usize,
    pub timeout: Duration,
}

impl JiraConfig {
    #[must_use]
    pub fn new(
        base_url: impl Into<String>,
        email: impl Into<String>,
        api_token: impl Into<String>,
        project_key: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            email: email.into(),
            api_token: api_token.into(),
            project_key: project_key.into(),
            issue_type: DEFAULT_JIRA_ISSUE_TYPE.to_string(),
            custom_fields: BTreeMap::new(),
            max_attachment_bytes: DEFAULT_MAX_ATTACHMENT_BYTES,
            timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }

    #[must_use]
    pub fn with_issue_type(mut self, issue_type: impl Into<String>) -> Self {
        self.issue_type = issue_type.into();
        self
    }

    #[must_use]
    pub fn with_custom_field(mut self, key: impl Into<String>, value: JiraFieldValue) -> Self {
        self.custom_fields.insert(key.into(), value);
        self
    }

    #[must_use]
    pub fn with_max_attachment_bytes(mut self, bytes: usize) -> Self {
        self.max_attachment_bytes = bytes;
        self
    }

    #[must_use]
    pub fn from_settings(settings: &JiraSettings, timeout: Duration) -> Self {
        Self {
            base_url: settings.base_url.clone(),
            email: settings.email.clone(),
            api_token: settings.api_token.clone(),
            project_key: settings.project_key.clone(),
            issue_type: settings.issue_type.clone(),
            custom_fields: settings.custom_fields.clone(),
            max_attachment_bytes: settings.max_attachment_bytes,
            timeout,
        }
    }

    /// Read `JIRA_*` variables from the process environment
    ///
    /// # Errors
    ///
    /// Returns `JiraError::MissingEnvironmentVariable` naming the first absent variable.
    pub fn from_env() -> Result<Self, JiraError> {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    /// [`JiraConfig::from_env`] with an injectable lookup
    ///
    /// # Errors
    ///
    /// Returns `JiraError::MissingEnvironmentVariable` naming the first absent variable.
    pub fn from_env_with(env: impl Fn(&str) -> Option<String>) -> Result<Self, JiraError> {
        let require = |key: &str| {
            env(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| JiraError::MissingEnvironmentVariable(key.to_string()))
        };

        let config = Self::new(
            require("JIRA_BASE_URL")?,
            require("JIRA_EMAIL")?,
            require("JIRA_API_TOKEN")?,
            require("JIRA_PROJECT_KEY")?,
        );
        Ok(match env("JIRA_ISSUE_TYPE").filter(|v| !v.trim().is_empty()) {
            Some(issue_type) => config.with_issue_type(issue_type),
            None => config,
        })
    }

    fn auth_header(&self) -> String {
        let credentials = format!("{}:{}", self.email, self.api_token);
        format!("Basic {}", BASE64.encode(credentials))
    }

    #[must_use]
    pub fn browse_url(&self, issue_key: &str) -> String {
        format!("{}/browse/{issue_key}", self.base_url)
    }
}

impl std::fmt::Debug for JiraConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JiraConfig")
            .field("base_url", &self.base_url)
            .field("email", &self.email)
            .field("api_token", &mask_secret(&self.api_token))
            .field("project_key", &self.project_key)
            .field("issue_type", &self.issue_type)
            .field("custom_fields", &self.custom_fields.len())
            .field("max_attachment_bytes", &self.max_attachment_bytes)
            .finish_non_exhaustive()
    }
}

/// Jira-specific failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum JiraError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvironmentVariable(String),

    #[error(transparent)]
    Http(#[from] HttpError),

    #[error("Jira request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid Jira response: {0}")]
    InvalidResponse(String),

    /// The issue exists but an attachment did not upload
    #[error("Attachment upload failed for {issue_key}: {message}")]
    AttachmentUpload { issue_key: String, message: String },
}

impl From<JiraError> for FeedbackError {
    fn from(err: JiraError) -> Self {
        match err {
            JiraError::MissingEnvironmentVariable(_) => {
                FeedbackError::InvalidConfiguration(err.to_string())
            }
            JiraError::Http(http) => FeedbackError::from(http),
            JiraError::RequestFailed(message) => FeedbackError::SubmissionFailed(message),
            JiraError::InvalidResponse(message) => FeedbackError::InvalidResponse(message),
            JiraError::AttachmentUpload { issue_key, message } => {
                FeedbackError::PartialSubmission {
                    identifier: issue_key,
                    reason: message,
                }
            }
        }
    }
}

/// Files feedback as Jira issues
#[derive(Debug, Clone)]
pub struct JiraProvider {
    client: HttpClient,
    config: JiraConfig,
}

impl JiraProvider {
    pub const NAME: &'static str = "Jira";

    /// # Errors
    ///
    /// Returns `JiraError::Http` if the HTTP client cannot be constructed
    pub fn new(config: JiraConfig) -> Result<Self, JiraError> {
        let client = HttpClient::with_timeout(config.timeout)?;
        Ok(Self { client, config })
    }

    #[must_use]
    pub fn config(&self) -> &JiraConfig {
        &self.config
    }

    async fn create_issue(&self, payload: &Value) -> Result<String, JiraError> {
        let url = format!("{}/rest/api/3/issue", self.config.base_url);
        let request = self
            .client
            .client()
            .post(url)
            .header("Authorization", self.config.auth_header())
            .json(payload);

        let response = self.client.send(request, SERVICE).await?;
        let body = response
            .text()
            .await
            .map_err(|e| JiraError::RequestFailed(format!("Failed to read Jira response: {e}")))?;
        parse_issue_key(&body)
    }

    async fn upload_attachment(
        &self,
        issue_key: &str,
        attachment: &Attachment,
    ) -> Result<(), JiraError> {
        let upload_error = |message: String| JiraError::AttachmentUpload {
            issue_key: issue_key.to_string(),
            message,
        };

        let mime_type = attachment
            .mime_type()
            .map_err(|e| upload_error(e.to_string()))?;
        let part = Part::bytes(attachment.bytes().to_vec())
            .file_name(upload_file_name(attachment))
            .mime_str(mime_type)
            .map_err(|e| upload_error(format!("invalid MIME type '{mime_type}': {e}")))?;
        let form = Form::new().part("file", part);

        let url = format!(
            "{}/rest/api/3/issue/{issue_key}/attachments",
            self.config.base_url
        );
        let request = self
            .client
            .client()
            .post(url)
            .header("Authorization", self.config.auth_header())
            .header("X-Atlassian-Token", "no-check")
            .multipart(form);

        self.client
            .send(request, SERVICE)
            .await
            .map_err(|e| upload_error(e.to_string()))?;
        Ok(())
    }

    async fn submit_inner(
        &self,
        feedback: &FeedbackItem,
        metadata: &FeedbackMetadata,
    ) -> Result<FeedbackResult, FeedbackError> {
        for attachment in &feedback.attachments {
            attachment.validate(self.config.max_attachment_bytes)?;
        }

        let description = format_description(feedback, metadata);
        let payload = issue_payload(&self.config, &feedback.title, &description);
        let issue_key = self.create_issue(&payload).await?;
        info!(issue_key = %issue_key, project = %self.config.project_key, "Created Jira issue");

        for (index, attachment) in feedback.attachments.iter().enumerate() {
            self.upload_attachment(&issue_key, attachment).await?;
            debug!(issue_key = %issue_key, index, bytes = attachment.len(), "Uploaded attachment");
        }

        Ok(FeedbackResult::new(
            issue_key.clone(),
            Some(self.config.browse_url(&issue_key)),
            Self::NAME,
        ))
    }
}

#[async_trait]
impl FeedbackProvider for JiraProvider {
    fn name(&self) -> &str {
        Self::NAME
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

/// Render the plain-text issue description
///
/// The user's text (or a placeholder) is followed by an environment block,
/// the metadata custom fields sorted by key, and an AI marker when the text
/// was rewritten.
#[must_use]
pub fn format_description(feedback: &FeedbackItem, metadata: &FeedbackMetadata) -> String {
    let mut description = feedback.description_or_placeholder().to_string();

    description.push_str("\n\n---\n**Environment Information**\n");
    description.push_str(&format!("Device: {}\n", metadata.device_model));
    description.push_str(&format!("OS Version: {}\n", metadata.os_version));
    description.push_str(&format!(
        "App Version: {} (Build {})\n",
        metadata.app_version, metadata.app_build
    ));
    description.push_str(&format!("Locale: {}", metadata.locale));

    if !metadata.custom_fields.is_empty() {
        description.push('\n');
        for (key, value) in &metadata.custom_fields {
            description.push_str(&format!("\n{key}: {value}"));
        }
    }

    if feedback.is_ai_generated {
        description.push_str("\n\n");
        description.push_str(AI_MARKER);
    }

    description
}

/// Build the create-issue request body with an ADF description
pub(crate) fn issue_payload(config: &JiraConfig, summary: &str, description: &str) -> Value {
    let mut fields = Map::new();
    fields.insert("project".into(), json!({ "key": config.project_key }));
    fields.insert("summary".into(), json!(summary));
    fields.insert("issuetype".into(), json!({ "name": config.issue_type }));
    fields.insert(
        "description".into(),
        json!({
            "type": "doc",
            "version": 1,
            "content": [{
                "type": "paragraph",
                "content": [{ "type": "text", "text": description }]
            }]
        }),
    );

    for (key, value) in &config.custom_fields {
        let value = match value {
            JiraFieldValue::String(s) => json!(s),
            JiraFieldValue::Array(items) => Value::Array(
                items
                    .iter()
                    .map(|item| json!({ "value": item }))
                    .collect(),
            ),
            JiraFieldValue::Nested(map) => json!(map),
        };
        fields.insert(key.clone(), value);
    }

    json!({ "fields": fields })
}

#[derive(Debug, Deserialize)]
struct CreatedIssue {
    key: Option<String>,
}

fn parse_issue_key(body: &str) -> Result<String, JiraError> {
    let created: CreatedIssue = serde_json::from_str(body)
        .map_err(|e| JiraError::InvalidResponse(format!("Failed to parse Jira response: {e}")))?;
    created
        .key
        .filter(|key| !key.trim().is_empty())
        .ok_or_else(|| JiraError::InvalidResponse("Missing 'key' in Jira response".to_string()))
}

/// Screenshots get a unique name so repeated uploads stay distinguishable
fn upload_file_name(attachment: &Attachment) -> String {
    match &attachment.kind {
        AttachmentKind::Image { .. } => {
            let name = attachment.filename();
            let (stem, ext) = name.rsplit_once('.').unwrap_or((name.as_str(), "bin"));
            let id = Uuid::new_v4().simple().to_string();
            format!("{stem}-{}.{ext}", &id[..8])
        }
        AttachmentKind::Data { filename, .. } => filename.clone(),
    }
}
