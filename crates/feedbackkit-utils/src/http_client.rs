//! Shared HTTP client infrastructure for network backends
//!
//! This module provides a `reqwest::Client` configured once per backend with
//! connect and request timeouts, and maps transport failures and non-2xx
//! statuses to [`HttpError`]. It does not retry: retry is a user-initiated
//! repeat of the same intent.

use crate::error::FeedbackError;
use crate::redaction::redact_error_message;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// Default request timeout (60 seconds)
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Default connect timeout (15 seconds)
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(15);

/// Error bodies are cut to this many characters before they reach a message
const MAX_ERROR_BODY_CHARS: usize = 512;

/// Failure of a single HTTP exchange.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HttpError {
    #[error("Failed to build HTTP client: {0}")]
    Client(String),

    #[error("{service} request failed: {message}")]
    Transport { service: String, message: String },

    #[error("{service} request timed out after {duration:?}")]
    Timeout { service: String, duration: Duration },

    #[error("{service} authentication failed: HTTP {status}")]
    Auth { service: String, status: u16 },

    #[error("{service} rate limit exceeded: HTTP {status}")]
    RateLimited { service: String, status: u16 },

    #[error("{service} returned HTTP {status}: {body}")]
    Status {
        service: String,
        status: u16,
        body: String,
    },
}

impl HttpError {
    /// HTTP status code, when the server answered at all.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Auth { status, .. }
            | Self::RateLimited { status, .. }
            | Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<HttpError> for FeedbackError {
    fn from(err: HttpError) -> Self {
        match err {
            HttpError::Client(_) | HttpError::Auth { .. } => {
                FeedbackError::InvalidConfiguration(err.to_string())
            }
            HttpError::Transport { .. } | HttpError::Timeout { .. } => {
                FeedbackError::Network(err.to_string())
            }
            HttpError::RateLimited { .. } | HttpError::Status { .. } => {
                FeedbackError::SubmissionFailed(err.to_string())
            }
        }
    }
}

/// Shared HTTP client for feedback backends
///
/// `reqwest::Client` pools connections internally, so cloning an
/// `HttpClient` is cheap and clones share the pool.
#[derive(Clone, Debug)]
pub struct HttpClient {
    client: Client,
    timeout: Duration,
}

impl HttpClient {
    /// Create a new HTTP client with the default request timeout
    ///
    /// # Errors
    ///
    /// Returns `HttpError::Client` if the client cannot be constructed
    pub fn new() -> Result<Self, HttpError> {
        Self::with_timeout(DEFAULT_REQUEST_TIMEOUT)
    }

    /// Create a new HTTP client with a custom request timeout
    ///
    /// # Errors
    ///
    /// Returns `HttpError::Client` if the client cannot be constructed
    pub fn with_timeout(timeout: Duration) -> Result<Self, HttpError> {
        let client = Client::builder()
            .connect_timeout(DEFAULT_CONNECT_TIMEOUT.min(timeout))
            .pool_idle_timeout(Duration::from_secs(90))
            .user_agent(concat!("feedbackkit/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| HttpError::Client(e.to_string()))?;

        Ok(Self { client, timeout })
    }

    /// Underlying client, used by backends to start request builders.
    #[must_use]
    pub fn client(&self) -> &Client {
        &self.client
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Execute a request once and return the response if the status is 2xx
    ///
    /// # Errors
    ///
    /// - `HttpError::Auth` for 401/403
    /// - `HttpError::RateLimited` for 429
    /// - `HttpError::Status` for any other non-2xx status (body included, truncated and redacted)
    /// - `HttpError::Timeout` when the request exceeds the timeout
    /// - `HttpError::Transport` for connection and protocol failures
    pub async fn send(
        &self,
        request: RequestBuilder,
        service: &str,
    ) -> Result<Response, HttpError> {
        debug!(
            service = service,
            timeout_secs = self.timeout.as_secs(),
            "Executing HTTP request"
        );

        let response = request.timeout(self.timeout).send().await.map_err(|e| {
            if e.is_timeout() {
                HttpError::Timeout {
                    service: service.to_string(),
                    duration: self.timeout,
                }
            } else {
                HttpError::Transport {
                    service: service.to_string(),
                    message: redact_error_message(&e.to_string()),
                }
            }
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let error = map_status_error(status, service, &body);
        warn!(service = service, status = status.as_u16(), "HTTP request rejected");
        Err(error)
    }
}

/// Map a non-success status code to an `HttpError` variant
fn map_status_error(status: StatusCode, service: &str, body: &str) -> HttpError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => HttpError::Auth {
            service: service.to_string(),
            status: status.as_u16(),
        },
        StatusCode::TOO_MANY_REQUESTS => HttpError::RateLimited {
            service: service.to_string(),
            status: status.as_u16(),
        },
        _ => HttpError::Status {
            service: service.to_string(),
            status: status.as_u16(),
            body: summarize_body(body),
        },
    }
}

fn summarize_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "Unknown error".to_string();
    }
    let mut summary: String = trimmed.chars().take(MAX_ERROR_BODY_CHARS).collect();
    if trimmed.chars().count() > MAX_ERROR_BODY_CHARS {
        summary.push('…');
    }
    redact_error_message(&summary)
}
