//! feedbackkit: collect user feedback, optionally improve it with AI, and
//! file it with a pluggable backend.
//!
//! This crate re-exports the workspace crates and hosts the `feedbackkit`
//! binary:
//!
//! - [`kit`]: value types and capability traits
//! - [`config`]: `feedbackkit.toml` + environment configuration
//! - [`flow`]: the submission state machine and its runtime
//! - [`providers`]: Jira and webhook backends
//! - [`ai`]: OpenAI and Anthropic description enhancers
//!
//! ```rust,no_run
//! use feedbackkit::{Config, FeedbackStore, FlowConfig, FlowDependencies};
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::discover()?;
//! let deps = FlowDependencies::noop()
//!     .with_provider(feedbackkit::providers::from_config(&config)?)
//!     .with_enhancer(feedbackkit::ai::from_config(&config)?);
//!
//! let mut store = FeedbackStore::new(deps, FlowConfig::from(&config));
//! store.set_title("Sync stalls");
//! store.submit();
//! store.settle().await;
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod clipboard;
pub mod exit_codes;
pub mod screenshot;

pub use feedbackkit_ai as ai;
pub use feedbackkit_config as config;
pub use feedbackkit_core as kit;
pub use feedbackkit_flow as flow;
pub use feedbackkit_providers as providers;
pub use feedbackkit_utils as utils;

pub use clipboard::SystemClipboard;
pub use exit_codes::ExitCode;
pub use feedbackkit_config::{Config, ConfigBuilder, ConfigError, ProviderKind};
pub use feedbackkit_core::{
    Attachment, FeedbackError, FeedbackItem, FeedbackMetadata, FeedbackResult, FeedbackProvider,
    DescriptionEnhancer, MetadataCollector,
};
pub use feedbackkit_flow::{
    Action, FeedbackStore, FlowConfig, FlowDependencies, SubmissionState, reduce,
};
pub use screenshot::FileScreenshotCapture;
