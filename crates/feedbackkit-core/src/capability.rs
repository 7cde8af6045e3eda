//! Capability traits injected into a feedback flow

use async_trait::async_trait;

use crate::attachment::Screenshot;
use crate::types::{FeedbackItem, FeedbackMetadata, FeedbackResult};
use feedbackkit_utils::error::FeedbackError;

/// Trait for feedback backends (issue trackers, webhooks, custom APIs)
///
/// Implementations hold only immutable configuration so that one instance can
/// be shared by every flow in the process.
#[async_trait]
pub trait FeedbackProvider: Send + Sync {
    /// Human-readable backend name, also reported in [`FeedbackResult::provider_name`]
    fn name(&self) -> &str;

    /// Submit feedback with metadata and return the backend's receipt
    ///
    /// # Errors
    ///
    /// Returns `FeedbackError` for any failure: transport, non-success status,
    /// malformed response, or rejected attachments. Implementations do not retry.
    async fn submit(
        &self,
        feedback: &FeedbackItem,
        metadata: &FeedbackMetadata,
    ) -> Result<FeedbackResult, FeedbackError>;
}

/// Trait for rewriting a feedback description
#[async_trait]
pub trait DescriptionEnhancer: Send + Sync {
    /// Return an improved version of `description`
    ///
    /// # Errors
    ///
    /// Returns `FeedbackError::EnhancementFailed` for transport or status
    /// failures and `FeedbackError::InvalidResponse` when the response cannot
    /// be understood.
    async fn enhance(&self, description: &str) -> Result<String, FeedbackError>;
}

/// Trait for collecting app and device metadata
///
/// Collection cannot fail: unknown values are reported as [`UNKNOWN`](crate::UNKNOWN).
#[async_trait]
pub trait MetadataCollector: Send + Sync {
    async fn collect(&self) -> FeedbackMetadata;
}

/// Trait for platform screenshot capture
#[async_trait]
pub trait ScreenshotCapture: Send + Sync {
    /// Capture the current screen, or `None` when capture is unavailable
    async fn capture(&self) -> Option<Screenshot>;
}

/// Trait for the platform clipboard
pub trait Clipboard: Send + Sync {
    /// Replace the clipboard contents with `text`
    ///
    /// # Errors
    ///
    /// Returns `FeedbackError::Clipboard` when no clipboard is reachable.
    fn set_text(&self, text: &str) -> Result<(), FeedbackError>;
}
