pub mod error;
pub mod http_client;
pub mod logging;
pub mod redaction;

pub use error::{ErrorCategory, FeedbackError};
