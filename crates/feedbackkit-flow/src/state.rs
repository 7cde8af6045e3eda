//! Observable state of one feedback flow

use feedbackkit_core::{Attachment, FeedbackItem, FeedbackResult, NO_DESCRIPTION, Screenshot};

/// Everything a presentation layer needs to render a feedback form
///
/// Created empty, mutated only by [`reduce`](crate::reduce), and published as
/// a snapshot after every intent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubmissionState {
    pub title: String,
    pub message: String,
    pub screenshot: Option<Screenshot>,
    /// Files attached alongside the screenshot
    pub attachments: Vec<Attachment>,

    /// A submission is in flight
    pub is_sending: bool,
    /// An enhancement is in flight
    pub is_improving: bool,
    /// `message` was last replaced by an enhancer
    pub is_ai_generated: bool,

    pub result: Option<FeedbackResult>,
    pub error: Option<String>,
    /// `None` until the first submission attempt completes
    pub is_success: Option<bool>,

    pub show_markdown_preview: bool,
    pub show_share_sheet: bool,
    pub show_copied_confirmation: bool,
}

impl SubmissionState {
    /// Nothing in flight and a non-blank title
    #[must_use]
    pub fn can_submit(&self) -> bool {
        !self.title.trim().is_empty() && !self.is_busy()
    }

    /// Nothing in flight and a non-blank message
    #[must_use]
    pub fn can_improve(&self) -> bool {
        !self.message.trim().is_empty() && !self.is_busy()
    }

    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.is_sending || self.is_improving
    }

    /// Snapshot the editable fields as a submission
    #[must_use]
    pub fn feedback_item(&self) -> FeedbackItem {
        let description = if self.message.trim().is_empty() {
            NO_DESCRIPTION
        } else {
            self.message.as_str()
        };

        let mut item =
            FeedbackItem::new(self.title.clone(), description).ai_generated(self.is_ai_generated);
        if let Some(screenshot) = &self.screenshot {
            item = item.with_attachment(screenshot.clone().into_attachment());
        }
        for attachment in &self.attachments {
            item = item.with_attachment(attachment.clone());
        }
        item
    }
}
