//! Pure state transitions

use tracing::debug;

use crate::action::{Action, Effect};
use crate::state::SubmissionState;

/// Prefix of the error shown when enhancement fails
pub const IMPROVE_FAILED_PREFIX: &str = "Failed to improve description: ";

/// Apply one intent to `state` and return the work it requires
///
/// Every state mutation of a flow happens here. Responses that arrive while
/// nothing of their kind is in flight are stale and ignored.
pub fn reduce(state: &mut SubmissionState, action: Action) -> Effect {
    match action {
        Action::SetTitle(title) => {
            state.title = title;
            Effect::None
        }
        Action::MessageChanged(message) => {
            state.message = message;
            Effect::None
        }

        Action::Submit => {
            if state.is_busy() {
                debug!(
                    is_sending = state.is_sending,
                    is_improving = state.is_improving,
                    "Ignoring submit while busy"
                );
                return Effect::None;
            }
            state.is_sending = true;
            state.error = None;
            Effect::Submit(state.feedback_item())
        }
        Action::FeedbackResponse(response) => {
            if !state.is_sending {
                return Effect::None;
            }
            state.is_sending = false;
            match response {
                Ok(result) => {
                    state.is_success = Some(true);
                    state.result = Some(result);
                }
                Err(err) => {
                    state.is_success = Some(false);
                    state.error = Some(err.to_string());
                }
            }
            Effect::None
        }

        Action::ImproveDescription => {
            if state.message.trim().is_empty() || state.is_busy() {
                return Effect::None;
            }
            state.is_improving = true;
            state.error = None;
            Effect::Enhance(state.message.clone())
        }
        Action::ImproveDescriptionResponse(response) => {
            if !state.is_improving {
                return Effect::None;
            }
            state.is_improving = false;
            match response {
                Ok(text) => {
                    state.message = text;
                    state.is_ai_generated = true;
                }
                Err(err) => {
                    state.error = Some(format!("{IMPROVE_FAILED_PREFIX}{err}"));
                }
            }
            Effect::None
        }

        Action::ToggleMarkdownPreview => {
            state.show_markdown_preview = !state.show_markdown_preview;
            Effect::None
        }
        Action::ToggleShareSheet => {
            state.show_share_sheet = !state.show_share_sheet;
            Effect::None
        }
        Action::ClearError => {
            state.error = None;
            Effect::None
        }

        Action::CopyResultReference => match &state.result {
            Some(result) => {
                state.show_copied_confirmation = true;
                Effect::CopyToClipboard(result.reference().to_string())
            }
            None => Effect::None,
        },
        Action::ClipboardFailed(err) => {
            state.show_copied_confirmation = false;
            state.error = Some(err.to_string());
            Effect::None
        }
        Action::HideCopiedConfirmation => {
            state.show_copied_confirmation = false;
            Effect::None
        }

        Action::CaptureScreenshot => Effect::CaptureScreenshot,
        Action::ScreenshotCaptured(screenshot) => {
            state.screenshot = screenshot;
            Effect::None
        }
        Action::RemoveScreenshot => {
            state.screenshot = None;
            Effect::None
        }
        Action::AttachFile(attachment) => {
            state.attachments.push(attachment);
            Effect::None
        }
        Action::RemoveAttachment(index) => {
            if index < state.attachments.len() {
                state.attachments.remove(index);
            }
            Effect::None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use feedbackkit_core::{Attachment, FeedbackError, FeedbackResult, Screenshot};
    use proptest::prelude::*;

    fn filled() -> SubmissionState {
        SubmissionState {
            title: "Crash".into(),
            message: "App crashes on login".into(),
            ..Default::default()
        }
    }

    fn jira_result() -> FeedbackResult {
        FeedbackResult::new(
            "PROJ-42",
            Some("https://x.atlassian.net/browse/PROJ-42".into()),
            "Jira",
        )
    }

    #[test]
    fn test_submit_success_lifecycle() {
        let mut state = filled();
        state.error = Some("stale".into());

        let effect = reduce(&mut state, Action::Submit);
        assert!(state.is_sending);
        assert!(state.error.is_none());
        match effect {
            Effect::Submit(item) => {
                assert_eq!(item.title, "Crash");
                assert_eq!(item.description, "App crashes on login");
                assert!(item.attachments.is_empty());
            }
            other => panic!("expected Submit, got {other:?}"),
        }

        reduce(&mut state, Action::FeedbackResponse(Ok(jira_result())));
        assert!(!state.is_sending);
        assert_eq!(state.is_success, Some(true));
        assert_eq!(state.result, Some(jira_result()));
        assert!(state.error.is_none());
    }

    #[test]
    fn test_submit_failure_keeps_input() {
        let mut state = filled();
        reduce(&mut state, Action::Submit);
        reduce(
            &mut state,
            Action::FeedbackResponse(Err(FeedbackError::Network("offline".into()))),
        );

        assert!(!state.is_sending);
        assert_eq!(state.is_success, Some(false));
        assert!(state.error.as_deref().unwrap().contains("offline"));
        assert_eq!(state.title, "Crash");
        assert_eq!(state.message, "App crashes on login");
    }

    #[test]
    fn test_submit_ignored_while_busy() {
        let mut state = filled();
        assert!(matches!(reduce(&mut state, Action::Submit), Effect::Submit(_)));
        assert!(reduce(&mut state, Action::Submit).is_none());
        assert!(reduce(&mut state, Action::ImproveDescription).is_none());
        assert!(!state.is_improving);

        let mut state = filled();
        reduce(&mut state, Action::ImproveDescription);
        assert!(reduce(&mut state, Action::Submit).is_none());
        assert!(!state.is_sending);
    }

    #[test]
    fn test_empty_message_submits_placeholder() {
        let mut state = SubmissionState {
            title: "Crash".into(),
            ..Default::default()
        };
        match reduce(&mut state, Action::Submit) {
            Effect::Submit(item) => assert_eq!(item.description, "No description provided"),
            other => panic!("expected Submit, got {other:?}"),
        }
    }

    #[test]
    fn test_improve_success_replaces_message() {
        let mut state = filled();
        assert_eq!(
            reduce(&mut state, Action::ImproveDescription),
            Effect::Enhance("App crashes on login".into())
        );
        assert!(state.is_improving);

        reduce(
            &mut state,
            Action::ImproveDescriptionResponse(Ok("Login crashes the app.".into())),
        );
        assert!(!state.is_improving);
        assert_eq!(state.message, "Login crashes the app.");
        assert!(state.is_ai_generated);

        match reduce(&mut state, Action::Submit) {
            Effect::Submit(item) => assert!(item.is_ai_generated),
            other => panic!("expected Submit, got {other:?}"),
        }
    }

    #[test]
    fn test_improve_failure_sets_prefixed_error() {
        let mut state = filled();
        reduce(&mut state, Action::ImproveDescription);
        reduce(
            &mut state,
            Action::ImproveDescriptionResponse(Err(FeedbackError::EnhancementFailed(
                "rate limited".into(),
            ))),
        );

        assert!(!state.is_improving);
        assert!(!state.is_ai_generated);
        assert_eq!(state.message, "App crashes on login");
        let error = state.error.unwrap();
        assert!(error.starts_with("Failed to improve description: "), "{error}");
        assert!(error.contains("rate limited"));
    }

    #[test]
    fn test_improve_empty_message_is_noop() {
        let mut state = SubmissionState::default();
        assert!(reduce(&mut state, Action::ImproveDescription).is_none());
        assert_eq!(state, SubmissionState::default());
    }

    #[test]
    fn test_stale_responses_are_ignored() {
        let mut state = filled();
        let before = state.clone();
        reduce(&mut state, Action::FeedbackResponse(Ok(jira_result())));
        reduce(&mut state, Action::ImproveDescriptionResponse(Ok("x".into())));
        assert_eq!(state, before);
    }

    #[test]
    fn test_copy_prefers_url_then_identifier() {
        let mut state = filled();
        assert!(reduce(&mut state, Action::CopyResultReference).is_none());
        assert!(!state.show_copied_confirmation);

        state.result = Some(jira_result());
        assert_eq!(
            reduce(&mut state, Action::CopyResultReference),
            Effect::CopyToClipboard("https://x.atlassian.net/browse/PROJ-42".into())
        );
        assert!(state.show_copied_confirmation);

        state.result = Some(FeedbackResult::new("NOOP-1a2b3c4d", None, "NoOp"));
        assert_eq!(
            reduce(&mut state, Action::CopyResultReference),
            Effect::CopyToClipboard("NOOP-1a2b3c4d".into())
        );

        reduce(&mut state, Action::HideCopiedConfirmation);
        assert!(!state.show_copied_confirmation);
    }

    #[test]
    fn test_clipboard_failure_surfaces_error() {
        let mut state = filled();
        state.result = Some(jira_result());
        reduce(&mut state, Action::CopyResultReference);
        reduce(
            &mut state,
            Action::ClipboardFailed(FeedbackError::Clipboard("no display".into())),
        );
        assert!(!state.show_copied_confirmation);
        assert!(state.error.unwrap().contains("no display"));
    }

    #[test]
    fn test_toggles_and_screenshot() {
        let mut state = SubmissionState::default();
        reduce(&mut state, Action::ToggleShareSheet);
        reduce(&mut state, Action::ToggleMarkdownPreview);
        assert!(state.show_share_sheet && state.show_markdown_preview);
        reduce(&mut state, Action::ToggleShareSheet);
        assert!(!state.show_share_sheet);

        assert_eq!(
            reduce(&mut state, Action::CaptureScreenshot),
            Effect::CaptureScreenshot
        );
        let shot = Screenshot::new(vec![0x89, b'P', b'N', b'G']);
        reduce(&mut state, Action::ScreenshotCaptured(Some(shot.clone())));
        assert_eq!(state.screenshot, Some(shot));
        reduce(&mut state, Action::RemoveScreenshot);
        assert!(state.screenshot.is_none());
    }

    #[test]
    fn test_attach_and_remove_files() {
        let mut state = filled();
        let log = Attachment::data(b"trace".to_vec(), "text/plain", "app.log");
        reduce(&mut state, Action::AttachFile(log.clone()));
        reduce(&mut state, Action::RemoveAttachment(7));
        assert_eq!(state.attachments, vec![log]);

        match reduce(&mut state, Action::Submit) {
            Effect::Submit(item) => assert_eq!(item.attachments.len(), 1),
            other => panic!("expected Submit, got {other:?}"),
        }

        reduce(&mut state, Action::RemoveAttachment(0));
        assert!(state.attachments.is_empty());
    }

    fn arb_error() -> impl Strategy<Value = FeedbackError> {
        prop_oneof![
            ".*".prop_map(FeedbackError::SubmissionFailed),
            ".*".prop_map(FeedbackError::Network),
            (1usize..1_000_000, 1usize..1_000).prop_map(|(size, max_size)| {
                FeedbackError::AttachmentTooLarge { size, max_size }
            }),
        ]
    }

    proptest! {
        #[test]
        fn prop_clear_error_is_idempotent(title in ".*", message in ".*", error in proptest::option::of(".*")) {
            let mut once = SubmissionState { title, message, error, ..Default::default() };
            reduce(&mut once, Action::ClearError);
            let mut twice = once.clone();
            reduce(&mut twice, Action::ClearError);

            prop_assert!(once.error.is_none());
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn prop_failed_submit_preserves_input(title in "\\PC+", message in ".*", err in arb_error()) {
            let mut state = SubmissionState {
                title: title.clone(),
                message: message.clone(),
                ..Default::default()
            };
            reduce(&mut state, Action::Submit);
            reduce(&mut state, Action::FeedbackResponse(Err(err.clone())));

            prop_assert_eq!(&state.title, &title);
            prop_assert_eq!(&state.message, &message);
            prop_assert!(!state.is_sending);
            prop_assert_eq!(state.is_success, Some(false));
            prop_assert_eq!(state.error, Some(err.to_string()));
        }

        #[test]
        fn prop_never_sending_and_improving(actions in proptest::collection::vec(0u8..6, 0..40)) {
            let mut state = filled();
            for code in actions {
                let action = match code {
                    0 => Action::Submit,
                    1 => Action::ImproveDescription,
                    2 => Action::FeedbackResponse(Ok(jira_result())),
                    3 => Action::ImproveDescriptionResponse(Ok("better".into())),
                    4 => Action::ClearError,
                    _ => Action::MessageChanged("edited".into()),
                };
                reduce(&mut state, action);
                prop_assert!(!(state.is_sending && state.is_improving));
            }
        }
    }
}
