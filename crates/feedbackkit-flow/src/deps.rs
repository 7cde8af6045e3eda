//! Injected capabilities and runtime settings

use std::sync::Arc;
use std::time::Duration;

use feedbackkit_config::{Config, DEFAULT_COPIED_CONFIRMATION_MS};
use feedbackkit_core::{
    Clipboard, DefaultMetadataCollector, DescriptionEnhancer, FeedbackProvider, MemoryClipboard,
    MetadataCollector, NoOpEnhancer, NoOpProvider, NoScreenshotCapture, ScreenshotCapture,
};

/// The leaves a flow talks to
///
/// Leaves are shared read-only; one set can back any number of flows.
#[derive(Clone)]
pub struct FlowDependencies {
    pub provider: Arc<dyn FeedbackProvider>,
    pub enhancer: Arc<dyn DescriptionEnhancer>,
    pub metadata: Arc<dyn MetadataCollector>,
    pub screenshot: Arc<dyn ScreenshotCapture>,
    pub clipboard: Arc<dyn Clipboard>,
}

impl FlowDependencies {
    /// Everything in-process: no-op provider, echo enhancer, memory clipboard
    #[must_use]
    pub fn noop() -> Self {
        Self {
            provider: Arc::new(NoOpProvider),
            enhancer: Arc::new(NoOpEnhancer),
            metadata: Arc::new(DefaultMetadataCollector::new(
                env!("CARGO_PKG_VERSION"),
                "0",
            )),
            screenshot: Arc::new(NoScreenshotCapture),
            clipboard: Arc::new(MemoryClipboard::new()),
        }
    }

    #[must_use]
    pub fn with_provider(mut self, provider: Arc<dyn FeedbackProvider>) -> Self {
        self.provider = provider;
        self
    }

    #[must_use]
    pub fn with_enhancer(mut self, enhancer: Arc<dyn DescriptionEnhancer>) -> Self {
        self.enhancer = enhancer;
        self
    }

    #[must_use]
    pub fn with_metadata(mut self, metadata: Arc<dyn MetadataCollector>) -> Self {
        self.metadata = metadata;
        self
    }

    #[must_use]
    pub fn with_screenshot(mut self, screenshot: Arc<dyn ScreenshotCapture>) -> Self {
        self.screenshot = screenshot;
        self
    }

    #[must_use]
    pub fn with_clipboard(mut self, clipboard: Arc<dyn Clipboard>) -> Self {
        self.clipboard = clipboard;
        self
    }
}

impl std::fmt::Debug for FlowDependencies {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlowDependencies")
            .field("provider", &self.provider.name())
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlowConfig {
    /// How long `show_copied_confirmation` stays set after a copy
    pub copied_confirmation_delay: Duration,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            copied_confirmation_delay: Duration::from_millis(DEFAULT_COPIED_CONFIRMATION_MS),
        }
    }
}

impl From<&Config> for FlowConfig {
    fn from(config: &Config) -> Self {
        Self {
            copied_confirmation_delay: config.flow.copied_confirmation_delay,
        }
    }
}
