use std::fmt;
use thiserror::Error;

/// Error type shared by every feedback capability.
///
/// `FeedbackError` is what providers, enhancers and the orchestrator exchange.
/// Backend crates keep their own richer error enums (`JiraError`, `AiError`,
/// `WebhookError`) and convert into this type at the capability boundary.
///
/// The type is `Clone + PartialEq` so it can travel inside orchestrator
/// intents and be asserted on in tests.
///
/// # Categories
///
/// | Category | Variants |
/// |----------|----------|
/// | `Configuration` | `InvalidConfiguration` |
/// | `Enhancement` | `EnhancementFailed` |
/// | `Submission` | `SubmissionFailed`, `InvalidResponse`, `PartialSubmission`, `Clipboard` |
/// | `Attachment` | `AttachmentTooLarge`, `UnsupportedAttachment` |
/// | `Network` | `Network` |
///
/// # Example
///
/// ```rust
/// use feedbackkit_utils::error::{ErrorCategory, FeedbackError};
///
/// let err = FeedbackError::AttachmentTooLarge { size: 20, max_size: 10 };
/// assert_eq!(err.category(), ErrorCategory::Attachment);
/// assert!(!err.suggestions().is_empty());
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FeedbackError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Submission failed: {0}")]
    SubmissionFailed(String),

    #[error("Enhancement failed: {0}")]
    EnhancementFailed(String),

    /// The backend answered, but not in the shape we expected.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Attachment exceeds maximum size of {max_size} bytes ({size} bytes)")]
    AttachmentTooLarge { size: usize, max_size: usize },

    #[error("Unsupported attachment: {0}")]
    UnsupportedAttachment(String),

    /// The backend created a record but a follow-up step failed.
    #[error("{identifier} was created but the submission did not complete: {reason}")]
    PartialSubmission { identifier: String, reason: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Clipboard error: {0}")]
    Clipboard(String),
}

/// Categories of errors, used by presentation layers to pick guidance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    Configuration,
    Enhancement,
    Submission,
    Attachment,
    Network,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration => write!(f, "Configuration"),
            Self::Enhancement => write!(f, "Enhancement"),
            Self::Submission => write!(f, "Submission"),
            Self::Attachment => write!(f, "Attachment"),
            Self::Network => write!(f, "Network"),
        }
    }
}

impl FeedbackError {
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidConfiguration(_) => ErrorCategory::Configuration,
            Self::EnhancementFailed(_) => ErrorCategory::Enhancement,
            Self::SubmissionFailed(_)
            | Self::InvalidResponse(_)
            | Self::PartialSubmission { .. }
            | Self::Clipboard(_) => ErrorCategory::Submission,
            Self::AttachmentTooLarge { .. } | Self::UnsupportedAttachment(_) => {
                ErrorCategory::Attachment
            }
            Self::Network(_) => ErrorCategory::Network,
        }
    }

    /// Suggested actions to resolve the error
    #[must_use]
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidConfiguration(_) => vec![
                "Check the feedbackkit.toml file and the related environment variables".to_string(),
                "Run `feedbackkit config` to see the effective configuration".to_string(),
            ],
            Self::EnhancementFailed(_) => vec![
                "Your description was kept unchanged; you can submit it as is".to_string(),
                "Verify the AI provider API key and model name".to_string(),
            ],
            Self::SubmissionFailed(_) | Self::InvalidResponse(_) => vec![
                "Your title and description were kept; try submitting again".to_string(),
            ],
            Self::PartialSubmission { identifier, .. } => vec![format!(
                "Check {identifier} in the tracker before resubmitting to avoid a duplicate"
            )],
            Self::AttachmentTooLarge { max_size, .. } => vec![
                format!("Attach a file smaller than {max_size} bytes"),
                "Crop or downscale the screenshot before attaching it".to_string(),
            ],
            Self::UnsupportedAttachment(_) => vec![
                "Attach PNG, JPEG, GIF or WebP images, or send the file as raw data with a MIME type"
                    .to_string(),
            ],
            Self::Network(_) => vec![
                "Check your network connection and try again".to_string(),
            ],
            Self::Clipboard(_) => vec![
                "Copy the reference manually from the result".to_string(),
            ],
        }
    }

    /// Whether repeating the same intent might succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Network(_) | Self::SubmissionFailed(_) | Self::EnhancementFailed(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attachment_errors_are_categorised_separately_from_network() {
        let too_large = FeedbackError::AttachmentTooLarge {
            size: 11,
            max_size: 10,
        };
        let unsupported = FeedbackError::UnsupportedAttachment("application/x-foo".into());
        let network = FeedbackError::Network("connection reset".into());

        assert_eq!(too_large.category(), ErrorCategory::Attachment);
        assert_eq!(unsupported.category(), ErrorCategory::Attachment);
        assert_eq!(network.category(), ErrorCategory::Network);
    }

    #[test]
    fn test_attachment_too_large_message_names_limit() {
        let err = FeedbackError::AttachmentTooLarge {
            size: 2048,
            max_size: 1024,
        };
        let msg = err.to_string();
        assert!(msg.contains("1024"), "got: {msg}");
        assert!(msg.contains("2048"), "got: {msg}");
    }

    #[test]
    fn test_partial_submission_names_identifier() {
        let err = FeedbackError::PartialSubmission {
            identifier: "PROJ-7".into(),
            reason: "attachment upload failed".into(),
        };
        assert!(err.to_string().starts_with("PROJ-7 was created"));
        assert!(err.suggestions()[0].contains("PROJ-7"));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_every_variant_has_suggestions() {
        let errors = [
            FeedbackError::InvalidConfiguration("x".into()),
            FeedbackError::SubmissionFailed("x".into()),
            FeedbackError::EnhancementFailed("x".into()),
            FeedbackError::InvalidResponse("x".into()),
            FeedbackError::AttachmentTooLarge {
                size: 2,
                max_size: 1,
            },
            FeedbackError::UnsupportedAttachment("x".into()),
            FeedbackError::PartialSubmission {
                identifier: "A-1".into(),
                reason: "x".into(),
            },
            FeedbackError::Network("x".into()),
            FeedbackError::Clipboard("x".into()),
        ];
        for err in errors {
            assert!(!err.suggestions().is_empty(), "{err:?} has no suggestions");
        }
    }

    #[test]
    fn test_category_display() {
        assert_eq!(ErrorCategory::Attachment.to_string(), "Attachment");
        assert_eq!(ErrorCategory::Configuration.to_string(), "Configuration");
    }
}
