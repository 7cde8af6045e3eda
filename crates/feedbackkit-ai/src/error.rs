use feedbackkit_utils::error::FeedbackError;
use feedbackkit_utils::http_client::HttpError;
use thiserror::Error;

/// Enhancer failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AiError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvironmentVariable(String),

    /// Transport failure or non-2xx status
    #[error("AI request failed: {0}")]
    RequestFailed(String),

    /// 2xx response without the expected text
    #[error("Invalid AI response: {0}")]
    InvalidResponse(String),
}

impl From<HttpError> for AiError {
    fn from(err: HttpError) -> Self {
        AiError::RequestFailed(err.to_string())
    }
}

impl From<AiError> for FeedbackError {
    fn from(err: AiError) -> Self {
        match err {
            AiError::MissingEnvironmentVariable(_) => {
                FeedbackError::InvalidConfiguration(err.to_string())
            }
            AiError::RequestFailed(message) => FeedbackError::EnhancementFailed(message),
            AiError::InvalidResponse(message) => FeedbackError::InvalidResponse(message),
        }
    }
}
