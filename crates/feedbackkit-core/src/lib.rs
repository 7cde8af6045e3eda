//! Core types and capability contracts for feedbackkit
//!
//! A feedback flow depends on five capabilities, each a trait object:
//!
//! - [`FeedbackProvider`]: files a [`FeedbackItem`] with a backend and returns a [`FeedbackResult`]
//! - [`DescriptionEnhancer`]: rewrites a description (AI-backed or echo)
//! - [`MetadataCollector`]: snapshots app/device context, never fails
//! - [`ScreenshotCapture`]: produces an encoded screenshot, or nothing
//! - [`Clipboard`]: receives the result reference on copy
//!
//! No capability knows about another one; the orchestrator in
//! `feedbackkit-flow` is the only place they meet.

mod attachment;
mod capability;
mod metadata;
mod noop;
mod types;

pub use attachment::{Attachment, AttachmentKind, DEFAULT_COMPRESSION_QUALITY, ImageFormat, Screenshot};
pub use capability::{
    Clipboard, DescriptionEnhancer, FeedbackProvider, MetadataCollector, ScreenshotCapture,
};
pub use metadata::{DefaultMetadataCollector, StaticMetadataCollector, UNKNOWN};
pub use noop::{
    MemoryClipboard, NoOpEnhancer, NoOpProvider, NoScreenshotCapture, PreviewEnhancer,
    PREVIEW_IDENTIFIER, PreviewProvider, StaticScreenshotCapture,
};
pub use types::{FeedbackItem, FeedbackMetadata, FeedbackResult, NO_DESCRIPTION};

pub use feedbackkit_utils::error::{ErrorCategory, FeedbackError};
