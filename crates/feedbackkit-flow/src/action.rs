//! Intents and effects

use feedbackkit_core::{Attachment, FeedbackError, FeedbackItem, FeedbackResult, Screenshot};

/// Everything that can happen to a flow
///
/// User intents come from the presentation layer; `*Response`, `*Captured`,
/// `ClipboardFailed` and `HideCopiedConfirmation` are fed back by the store
/// when an effect completes.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SetTitle(String),
    MessageChanged(String),
    Submit,
    FeedbackResponse(Result<FeedbackResult, FeedbackError>),
    ImproveDescription,
    ImproveDescriptionResponse(Result<String, FeedbackError>),
    ToggleMarkdownPreview,
    ToggleShareSheet,
    ClearError,
    CopyResultReference,
    ClipboardFailed(FeedbackError),
    HideCopiedConfirmation,
    CaptureScreenshot,
    ScreenshotCaptured(Option<Screenshot>),
    RemoveScreenshot,
    AttachFile(Attachment),
    RemoveAttachment(usize),
}

impl Action {
    /// Short name for logs; never includes user text
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Action::SetTitle(_) => "set_title",
            Action::MessageChanged(_) => "message_changed",
            Action::Submit => "submit",
            Action::FeedbackResponse(_) => "feedback_response",
            Action::ImproveDescription => "improve_description",
            Action::ImproveDescriptionResponse(_) => "improve_description_response",
            Action::ToggleMarkdownPreview => "toggle_markdown_preview",
            Action::ToggleShareSheet => "toggle_share_sheet",
            Action::ClearError => "clear_error",
            Action::CopyResultReference => "copy_result_reference",
            Action::ClipboardFailed(_) => "clipboard_failed",
            Action::HideCopiedConfirmation => "hide_copied_confirmation",
            Action::CaptureScreenshot => "capture_screenshot",
            Action::ScreenshotCaptured(_) => "screenshot_captured",
            Action::RemoveScreenshot => "remove_screenshot",
            Action::AttachFile(_) => "attach_file",
            Action::RemoveAttachment(_) => "remove_attachment",
        }
    }
}

/// Work the reducer asks the store to perform
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    /// Collect metadata, then submit once
    Submit(FeedbackItem),
    /// Enhance this text
    Enhance(String),
    /// Write the reference and arm the confirmation timer
    CopyToClipboard(String),
    CaptureScreenshot,
}

impl Effect {
    #[must_use]
    pub fn is_none(&self) -> bool {
        matches!(self, Effect::None)
    }
}
