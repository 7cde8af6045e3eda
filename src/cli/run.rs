//! Entry point and command dispatch

use clap::Parser;
use tracing::debug;

use super::args::{Cli, Commands};
use super::commands::{execute_config, execute_submit, load_config};
use crate::exit_codes::ExitCode;
use feedbackkit_core::FeedbackError;
use feedbackkit_utils::logging::init_tracing;
use feedbackkit_utils::redaction::redact_error_message;

/// Parse arguments, run the command, and report failures on stderr
///
/// # Errors
///
/// Returns the exit code the process should terminate with.
pub fn run() -> Result<(), ExitCode> {
    let cli = Cli::parse();

    if let Err(err) = init_tracing(cli.verbose) {
        eprintln!("warning: failed to initialise logging: {err}");
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|err| {
            eprintln!("error: failed to start async runtime: {err}");
            ExitCode::INTERNAL
        })?;

    let outcome = runtime.block_on(async {
        let config = load_config(cli.config.as_deref())?;
        match &cli.command {
            Commands::Submit(args) => {
                let mut config = config;
                if let Some(kind) = args.provider {
                    debug!(provider = %kind, "Provider overridden on the command line");
                    config.provider = kind;
                }
                execute_submit(&config, args).await
            }
            Commands::Config { json } => execute_config(&config, *json),
        }
    });

    outcome.map_err(|err| {
        report_error(&err);
        ExitCode::for_error(&err)
    })
}

fn report_error(err: &anyhow::Error) {
    eprintln!("error: {}", redact_error_message(&format!("{err:#}")));

    let suggestions = match err.downcast_ref::<FeedbackError>() {
        Some(feedback) => feedback.suggestions(),
        None => err
            .downcast_ref::<feedbackkit_config::ConfigError>()
            .map(|config| vec![config.suggestion()])
            .unwrap_or_default(),
    };
    for suggestion in suggestions {
        eprintln!("  hint: {suggestion}");
    }
}
