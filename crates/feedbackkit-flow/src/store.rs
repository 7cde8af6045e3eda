//! Effect runtime for one feedback flow
//!
//! [`FeedbackStore`] owns a [`SubmissionState`], runs every intent through
//! [`reduce`], and executes the returned [`Effect`] against the injected
//! [`FlowDependencies`]. Effects run as tokio tasks; their results come back
//! over a channel only the store drains, so every mutation lands on one
//! sequential timeline in the order it is applied.

use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task::{AbortHandle, JoinSet};
use tracing::{debug, error, info, warn};

use feedbackkit_core::Attachment;

use crate::action::{Action, Effect};
use crate::deps::{FlowConfig, FlowDependencies};
use crate::reducer::reduce;
use crate::state::SubmissionState;

/// Messages from effect tasks back to the store
#[derive(Debug)]
enum Completion {
    Intent(Action),
    /// Carries the generation of the timer that fired
    CopiedTimerElapsed(u64),
}

/// Stateful driver of one feedback flow
///
/// Must be used from within a tokio runtime: intents that produce effects
/// spawn tasks. Dropping the store aborts whatever is still running.
pub struct FeedbackStore {
    state: SubmissionState,
    deps: FlowDependencies,
    config: FlowConfig,
    tx: mpsc::UnboundedSender<Completion>,
    rx: mpsc::UnboundedReceiver<Completion>,
    snapshots: watch::Sender<SubmissionState>,
    tasks: JoinSet<()>,
    copied_timer: Option<AbortHandle>,
    copied_generation: u64,
    dismissed: bool,
}

impl FeedbackStore {
    #[must_use]
    pub fn new(deps: FlowDependencies, config: FlowConfig) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let state = SubmissionState::default();
        let (snapshots, _) = watch::channel(state.clone());
        debug!(provider = deps.provider.name(), "Feedback flow created");

        Self {
            state,
            deps,
            config,
            tx,
            rx,
            snapshots,
            tasks: JoinSet::new(),
            copied_timer: None,
            copied_generation: 0,
            dismissed: false,
        }
    }

    #[must_use]
    pub fn state(&self) -> &SubmissionState {
        &self.state
    }

    /// Receiver that observes a snapshot after every applied intent
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SubmissionState> {
        self.snapshots.subscribe()
    }

    /// Effects (including the copied-confirmation timer) still running
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.tasks.len()
    }

    #[must_use]
    pub fn is_dismissed(&self) -> bool {
        self.dismissed
    }

    /// Apply an intent now and start the effect it produces
    pub fn send(&mut self, action: Action) {
        if self.dismissed {
            debug!(action = action.name(), "Ignoring intent after dismiss");
            return;
        }
        self.apply(action);
    }

    /// Wait for the next effect result, apply it, and return it
    ///
    /// Returns `None` once nothing is in flight, or after [`dismiss`](Self::dismiss).
    pub async fn next(&mut self) -> Option<Action> {
        loop {
            if self.dismissed {
                return None;
            }

            let completion = match self.rx.try_recv() {
                Ok(completion) => completion,
                Err(_) => {
                    if self.tasks.is_empty() {
                        return None;
                    }
                    let received = tokio::select! {
                        completion = self.rx.recv() => completion,
                        joined = self.tasks.join_next() => {
                            if let Some(Err(err)) = joined
                                && err.is_panic()
                            {
                                error!(error = %err, "Feedback effect panicked");
                            }
                            None
                        }
                    };
                    match received {
                        Some(completion) => completion,
                        None => continue,
                    }
                }
            };

            if let Some(action) = self.resolve(completion) {
                self.apply(action.clone());
                return Some(action);
            }
        }
    }

    /// Apply results until nothing is in flight
    pub async fn settle(&mut self) {
        while self.next().await.is_some() {}
    }

    /// Cancel the confirmation timer and every in-flight effect
    ///
    /// Results that were already queued are discarded, as is anything sent
    /// afterwards. The last state stays readable.
    pub fn dismiss(&mut self) {
        if self.dismissed {
            return;
        }
        self.dismissed = true;
        if let Some(timer) = self.copied_timer.take() {
            timer.abort();
        }
        let aborted = self.tasks.len();
        self.tasks.abort_all();
        self.tasks.detach_all();

        let mut discarded = 0usize;
        while self.rx.try_recv().is_ok() {
            discarded += 1;
        }
        info!(aborted, discarded, "Feedback flow dismissed");
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.send(Action::SetTitle(title.into()));
    }

    pub fn set_message(&mut self, message: impl Into<String>) {
        self.send(Action::MessageChanged(message.into()));
    }

    pub fn submit(&mut self) {
        self.send(Action::Submit);
    }

    pub fn improve_description(&mut self) {
        self.send(Action::ImproveDescription);
    }

    pub fn clear_error(&mut self) {
        self.send(Action::ClearError);
    }

    pub fn copy_result_reference(&mut self) {
        self.send(Action::CopyResultReference);
    }

    pub fn toggle_share_sheet(&mut self) {
        self.send(Action::ToggleShareSheet);
    }

    pub fn toggle_markdown_preview(&mut self) {
        self.send(Action::ToggleMarkdownPreview);
    }

    pub fn capture_screenshot(&mut self) {
        self.send(Action::CaptureScreenshot);
    }

    pub fn remove_screenshot(&mut self) {
        self.send(Action::RemoveScreenshot);
    }

    pub fn attach(&mut self, attachment: Attachment) {
        self.send(Action::AttachFile(attachment));
    }

    fn resolve(&mut self, completion: Completion) -> Option<Action> {
        match completion {
            Completion::Intent(action) => Some(action),
            Completion::CopiedTimerElapsed(generation) => {
                if generation == self.copied_generation && self.copied_timer.take().is_some() {
                    Some(Action::HideCopiedConfirmation)
                } else {
                    debug!(generation, "Discarding superseded copied-confirmation timer");
                    None
                }
            }
        }
    }

    fn apply(&mut self, action: Action) {
        let mut next = Some(action);
        while let Some(action) = next.take() {
            debug!(action = action.name(), "Applying intent");
            let effect = reduce(&mut self.state, action);
            self.snapshots.send_replace(self.state.clone());
            next = self.run(effect);
        }
    }

    /// Start an effect; synchronous failures come back as a follow-up intent
    fn run(&mut self, effect: Effect) -> Option<Action> {
        match effect {
            Effect::None => None,
            Effect::Submit(item) => {
                let provider = Arc::clone(&self.deps.provider);
                let collector = Arc::clone(&self.deps.metadata);
                let tx = self.tx.clone();
                self.tasks.spawn(async move {
                    let metadata = collector.collect().await;
                    info!(
                        provider = provider.name(),
                        attachments = item.attachments.len(),
                        is_ai_generated = item.is_ai_generated,
                        app_version = %metadata.app_version,
                        "Submitting feedback"
                    );
                    let result = provider.submit(&item, &metadata).await;
                    match &result {
                        Ok(receipt) => info!(
                            provider = %receipt.provider_name,
                            identifier = %receipt.identifier,
                            url = receipt.url.as_deref().unwrap_or("-"),
                            "Feedback submitted"
                        ),
                        Err(err) => warn!(
                            provider = provider.name(),
                            category = ?err.category(),
                            error = %err,
                            "Feedback submission failed"
                        ),
                    }
                    let _ = tx.send(Completion::Intent(Action::FeedbackResponse(result)));
                });
                None
            }
            Effect::Enhance(text) => {
                let enhancer = Arc::clone(&self.deps.enhancer);
                let tx = self.tx.clone();
                self.tasks.spawn(async move {
                    debug!(chars = text.chars().count(), "Enhancing description");
                    let result = enhancer.enhance(&text).await;
                    if let Err(err) = &result {
                        warn!(error = %err, "Description enhancement failed");
                    }
                    let _ = tx.send(Completion::Intent(Action::ImproveDescriptionResponse(
                        result,
                    )));
                });
                None
            }
            Effect::CaptureScreenshot => {
                let capture = Arc::clone(&self.deps.screenshot);
                let tx = self.tx.clone();
                self.tasks.spawn(async move {
                    let screenshot = capture.capture().await;
                    debug!(captured = screenshot.is_some(), "Screenshot capture finished");
                    let _ = tx.send(Completion::Intent(Action::ScreenshotCaptured(screenshot)));
                });
                None
            }
            Effect::CopyToClipboard(text) => match self.deps.clipboard.set_text(&text) {
                Ok(()) => {
                    debug!("Copied result reference");
                    self.arm_copied_timer();
                    None
                }
                Err(err) => {
                    warn!(error = %err, "Clipboard write failed");
                    Some(Action::ClipboardFailed(err))
                }
            },
        }
    }

    /// Schedule the confirmation reset, replacing any pending one
    fn arm_copied_timer(&mut self) {
        if let Some(previous) = self.copied_timer.take() {
            previous.abort();
        }
        self.copied_generation += 1;
        let generation = self.copied_generation;
        let delay = self.config.copied_confirmation_delay;
        let tx = self.tx.clone();
        self.copied_timer = Some(self.tasks.spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(Completion::CopiedTimerElapsed(generation));
        }));
    }
}

impl std::fmt::Debug for FeedbackStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeedbackStore")
            .field("state", &self.state)
            .field("config", &self.config)
            .field("in_flight", &self.tasks.len())
            .field("dismissed", &self.dismissed)
            .finish_non_exhaustive()
    }
}
