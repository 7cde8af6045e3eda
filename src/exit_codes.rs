//! Process exit codes for the feedbackkit CLI
//!
//! | Code | Constant | Description |
//! |------|----------|-------------|
//! | 0 | `SUCCESS` | Feedback filed / command completed |
//! | 1 | `INTERNAL` | Unexpected failure |
//! | 2 | `CONFIGURATION` | Invalid arguments or configuration |
//! | 3 | `SUBMISSION` | The backend rejected the submission |
//! | 4 | `ATTACHMENT` | An attachment was too large or unsupported |
//! | 5 | `NETWORK` | The backend could not be reached |
//! | 6 | `ENHANCEMENT` | The AI enhancer failed |

use feedbackkit_config::ConfigError;
use feedbackkit_core::{ErrorCategory, FeedbackError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const INTERNAL: ExitCode = ExitCode(1);
    pub const CONFIGURATION: ExitCode = ExitCode(2);
    pub const SUBMISSION: ExitCode = ExitCode(3);
    pub const ATTACHMENT: ExitCode = ExitCode(4);
    pub const NETWORK: ExitCode = ExitCode(5);
    pub const ENHANCEMENT: ExitCode = ExitCode(6);

    /// Numeric value for `std::process::exit()`
    #[must_use]
    pub const fn as_i32(self) -> i32 {
        self.0
    }

    /// Pick the code for an error chain produced by a command
    #[must_use]
    pub fn for_error(err: &anyhow::Error) -> Self {
        if let Some(feedback) = err.downcast_ref::<FeedbackError>() {
            return Self::from(feedback);
        }
        if err.downcast_ref::<ConfigError>().is_some() || err.downcast_ref::<clap::Error>().is_some()
        {
            return Self::CONFIGURATION;
        }
        Self::INTERNAL
    }
}

impl From<&FeedbackError> for ExitCode {
    fn from(err: &FeedbackError) -> Self {
        match err.category() {
            ErrorCategory::Configuration => Self::CONFIGURATION,
            ErrorCategory::Submission => Self::SUBMISSION,
            ErrorCategory::Attachment => Self::ATTACHMENT,
            ErrorCategory::Network => Self::NETWORK,
            ErrorCategory::Enhancement => Self::ENHANCEMENT,
        }
    }
}
