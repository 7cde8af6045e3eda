//! Capability implementations that never leave the process
//!
//! These back the default flow, previews and tests. The no-op provider only
//! logs what it would have sent.

use async_trait::async_trait;
use std::sync::Mutex;
use std::time::Duration;
use tracing::info;
use uuid::Uuid;

use crate::attachment::Screenshot;
use crate::capability::{
    Clipboard, DescriptionEnhancer, FeedbackProvider, ScreenshotCapture,
};
use crate::types::{FeedbackItem, FeedbackMetadata, FeedbackResult};
use feedbackkit_utils::error::FeedbackError;

/// Provider that logs the feedback and reports a synthetic identifier
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpProvider;

impl NoOpProvider {
    pub const NAME: &'static str = "NoOp";
}

#[async_trait]
impl FeedbackProvider for NoOpProvider {
    fn name(&self) -> &str {
        Self::NAME
    }

    async fn submit(
        &self,
        feedback: &FeedbackItem,
        metadata: &FeedbackMetadata,
    ) -> Result<FeedbackResult, FeedbackError> {
        info!(
            title = %feedback.title,
            description = %feedback.description,
            attachments = feedback.attachments.len(),
            is_ai_generated = feedback.is_ai_generated,
            app_version = %metadata.app_version,
            os_version = %metadata.os_version,
            "NoOp provider received feedback"
        );

        let id = Uuid::new_v4().simple().to_string();
        Ok(FeedbackResult::new(
            format!("NOOP-{}", &id[..8]),
            None,
            Self::NAME,
        ))
    }
}

/// Identifier returned by [`PreviewProvider`]
pub const PREVIEW_IDENTIFIER: &str = "PREVIEW-1234";

/// Provider with a fixed, linkable result after a simulated delay
#[derive(Debug, Clone, Copy)]
pub struct PreviewProvider {
    delay: Duration,
}

impl PreviewProvider {
    pub const NAME: &'static str = "Preview";

    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for PreviewProvider {
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}

#[async_trait]
impl FeedbackProvider for PreviewProvider {
    fn name(&self) -> &str {
        Self::NAME
    }

    async fn submit(
        &self,
        _feedback: &FeedbackItem,
        _metadata: &FeedbackMetadata,
    ) -> Result<FeedbackResult, FeedbackError> {
        tokio::time::sleep(self.delay).await;
        Ok(FeedbackResult::new(
            PREVIEW_IDENTIFIER,
            Some(format!("https://example.com/ticket/{PREVIEW_IDENTIFIER}")),
            Self::NAME,
        ))
    }
}

/// Enhancer that returns its input unchanged
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpEnhancer;

#[async_trait]
impl DescriptionEnhancer for NoOpEnhancer {
    async fn enhance(&self, description: &str) -> Result<String, FeedbackError> {
        Ok(description.to_string())
    }
}

/// Enhancer that marks its input, for previews
#[derive(Debug, Clone, Copy, Default)]
pub struct PreviewEnhancer;

#[async_trait]
impl DescriptionEnhancer for PreviewEnhancer {
    async fn enhance(&self, description: &str) -> Result<String, FeedbackError> {
        Ok(format!("Enhanced: {description}"))
    }
}

/// Capture that never produces a screenshot
#[derive(Debug, Clone, Copy, Default)]
pub struct NoScreenshotCapture;

#[async_trait]
impl ScreenshotCapture for NoScreenshotCapture {
    async fn capture(&self) -> Option<Screenshot> {
        None
    }
}

/// Capture that hands out a pre-encoded image
#[derive(Debug, Clone)]
pub struct StaticScreenshotCapture {
    screenshot: Screenshot,
}

impl StaticScreenshotCapture {
    #[must_use]
    pub fn new(screenshot: Screenshot) -> Self {
        Self { screenshot }
    }
}

#[async_trait]
impl ScreenshotCapture for StaticScreenshotCapture {
    async fn capture(&self) -> Option<Screenshot> {
        Some(self.screenshot.clone())
    }
}

/// In-process clipboard
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    contents: Mutex<Option<String>>,
}

impl MemoryClipboard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Last text written, if any
    #[must_use]
    pub fn contents(&self) -> Option<String> {
        self.contents
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }
}

impl Clipboard for MemoryClipboard {
    fn set_text(&self, text: &str) -> Result<(), FeedbackError> {
        let mut guard = self
            .contents
            .lock()
            .map_err(|_| FeedbackError::Clipboard("clipboard lock poisoned".to_string()))?;
        *guard = Some(text.to_string());
        Ok(())
    }
}
