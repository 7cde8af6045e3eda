//! Logging infrastructure for feedbackkit
//!
//! Libraries in this workspace only emit `tracing` events. Binaries call
//! [`init_tracing`] once to install a subscriber.

use std::io::IsTerminal;
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

use crate::redaction::redact_error_message;

/// Check if colored output should be used.
///
/// Returns true only if stderr is a terminal and `NO_COLOR` is not set.
fn use_color() -> bool {
    std::io::stderr().is_terminal() && std::env::var_os("NO_COLOR").is_none()
}

/// Default filter directive when `RUST_LOG` is not set
#[must_use]
pub fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "feedbackkit=debug,info"
    } else {
        "feedbackkit=info,warn"
    }
}

/// Initialize the tracing subscriber for structured logging
///
/// `RUST_LOG` takes precedence; otherwise the verbose flag picks between
/// `feedbackkit=debug` and `feedbackkit=info`. Output goes to stderr so that
/// stdout stays reserved for command results.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init_tracing(verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter(verbose)))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    if verbose {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_ansi(use_color())
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_line_number(false)
                    .with_file(false)
                    .with_span_events(FmtSpan::CLOSE)
                    .compact(),
            )
            .try_init()?;
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_ansi(use_color())
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_line_number(false)
                    .with_file(false)
                    .compact(),
            )
            .try_init()?;
    }

    Ok(())
}

/// Log a backend failure with its message redacted.
pub fn log_backend_error(backend: &str, operation: &str, error: &dyn std::fmt::Display) {
    let sanitized = redact_error_message(&error.to_string());
    tracing::error!(
        backend = %backend,
        operation = %operation,
        error = %sanitized,
        "Backend call failed"
    );
}
