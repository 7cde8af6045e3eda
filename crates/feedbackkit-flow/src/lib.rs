//! Feedback submission flow
//!
//! A flow is a small state machine over [`SubmissionState`]:
//!
//! - [`reduce`] is the only function that mutates state. It takes one
//!   [`Action`] and returns the [`Effect`] the action needs.
//! - [`FeedbackStore`] executes effects against [`FlowDependencies`] on tokio
//!   tasks and feeds their results back as actions, publishing a snapshot to
//!   subscribers after each one.
//!
//! Only one submission and one enhancement can be in flight per flow, and the
//! two never overlap. Failures land on `state.error` as text; nothing is
//! retried automatically.
//!
//! ```rust,no_run
//! use feedbackkit_flow::{FeedbackStore, FlowConfig, FlowDependencies};
//!
//! # async fn demo() {
//! let mut store = FeedbackStore::new(FlowDependencies::noop(), FlowConfig::default());
//! store.set_title("Export hangs");
//! store.set_message("Exporting a 2 GB project never finishes");
//! store.submit();
//! store.settle().await;
//!
//! if let Some(result) = &store.state().result {
//!     println!("Filed {}", result.reference());
//! }
//! # }
//! ```

mod action;
mod deps;
mod reducer;
mod state;
mod store;

pub use action::{Action, Effect};
pub use deps::{FlowConfig, FlowDependencies};
pub use reducer::{IMPROVE_FAILED_PREFIX, reduce};
pub use state::SubmissionState;
pub use store::FeedbackStore;
