//! CLI argument definitions (clap)

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use feedbackkit_config::ProviderKind;

/// feedbackkit - file user feedback with an issue tracker or webhook
#[derive(Parser, Debug)]
#[command(name = "feedbackkit")]
#[command(about = "Collect feedback, optionally improve it with AI, and submit it to a backend")]
#[command(long_about = r#"
feedbackkit files a piece of feedback (title, description, screenshot, files)
with the configured backend and prints the resulting reference.

EXAMPLES:
  # File a bug with the configured provider
  feedbackkit submit --title "Export hangs" --message "Exporting a 2 GB project never finishes"

  # Attach a screenshot and a log, let the AI tidy the description, copy the link
  feedbackkit submit -t "Layout broken" -m - --screenshot shot.png --attach app.log --enhance --copy

  # Try the flow without a backend
  feedbackkit submit --provider preview --title "Just testing"

  # Show the effective configuration (secrets masked)
  feedbackkit config

CONFIGURATION:
  feedbackkit.toml is read from --config, $FEEDBACKKIT_CONFIG, or the nearest
  parent directory that has one. Environment variables (FEEDBACK_PROVIDER,
  JIRA_*, WEBHOOK_*, AI_PROVIDER, OPENAI_API_KEY, ANTHROPIC_API_KEY, AI_MODEL)
  override file values.
"#)]
#[command(version)]
pub struct Cli {
    /// Path to configuration file (overrides discovery)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Submit one piece of feedback
    Submit(SubmitArgs),

    /// Print the effective configuration
    Config {
        /// Emit JSON instead of key = value lines
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Debug, Clone)]
pub struct SubmitArgs {
    /// Feedback title (issue summary)
    #[arg(short, long)]
    pub title: String,

    /// Description text; `-` reads it from stdin
    #[arg(short, long)]
    pub message: Option<String>,

    /// Attach a file (repeatable)
    #[arg(short, long = "attach", value_name = "PATH")]
    pub attachments: Vec<PathBuf>,

    /// Attach an image file as the screenshot
    #[arg(long, value_name = "PATH")]
    pub screenshot: Option<PathBuf>,

    /// Improve the description with the configured AI provider first
    #[arg(long)]
    pub enhance: bool,

    /// Copy the result URL (or identifier) to the clipboard
    #[arg(long)]
    pub copy: bool,

    /// Override the configured provider (noop, preview, jira, webhook)
    #[arg(long)]
    pub provider: Option<ProviderKind>,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_submit() {
        let cli = Cli::try_parse_from([
            "feedbackkit",
            "submit",
            "--title",
            "Crash",
            "-m",
            "boom",
            "--attach",
            "a.log",
            "-a",
            "b.txt",
            "--provider",
            "preview",
            "--enhance",
            "--verbose",
        ])
        .unwrap();

        assert!(cli.verbose);
        let Commands::Submit(args) = cli.command else {
            panic!("expected submit");
        };
        assert_eq!(args.title, "Crash");
        assert_eq!(args.message.as_deref(), Some("boom"));
        assert_eq!(args.attachments.len(), 2);
        assert_eq!(args.provider, Some(ProviderKind::Preview));
        assert!(args.enhance && !args.copy);
    }

    #[test]
    fn test_submit_requires_title() {
        assert!(Cli::try_parse_from(["feedbackkit", "submit"]).is_err());
    }

    #[test]
    fn test_rejects_unknown_provider() {
        assert!(
            Cli::try_parse_from(["feedbackkit", "submit", "-t", "x", "--provider", "github"])
                .is_err()
        );
    }
}
